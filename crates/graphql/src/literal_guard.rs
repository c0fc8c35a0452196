//! Literal-token coercion for the `Date` scalar.
//!
//! async-graphql hands a scalar's `parse` the same [`Value`] whether it came
//! from a variable or was written inline in the document, so literal rules
//! cannot live in the scalar itself. [`DateLiteralGuard`] runs right after
//! the query is parsed, finds every inline literal that lands on a `Date`
//! argument or input field, and sends it through [`Date::parse_literal`].
//! A rejected literal fails the whole request at the literal's position.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use {
    async_graphql::{
        Pos, Positioned, ServerError, ServerResult, Variables,
        extensions::{Extension, ExtensionContext, ExtensionFactory, NextParseQuery},
        parser::{
            parse_schema,
            types::{
                BaseType, ExecutableDocument, FieldDefinition, OperationType, Selection,
                SelectionSet, Type, TypeKind, TypeSystemDefinition,
            },
        },
    },
    async_graphql_value::Value,
    tracing::warn,
};

use crate::{
    error::SchemaError,
    scalars::{Date, Literal, LiteralKind},
};

struct FieldShape {
    /// Named type the field returns, with list wrappers stripped.
    returns: String,
    args: HashMap<String, Type>,
}

/// Where a scalar can appear as an input in a schema: field arguments and
/// input-object fields, indexed from the schema's SDL.
pub struct ScalarPositions {
    scalar: String,
    query_root: String,
    mutation_root: String,
    subscription_root: String,
    fields: HashMap<String, HashMap<String, FieldShape>>,
    input_fields: HashMap<String, HashMap<String, Type>>,
}

fn named(ty: &Type) -> &str {
    match &ty.base {
        BaseType::Named(name) => name.as_str(),
        BaseType::List(inner) => named(inner),
    }
}

fn to_literal(value: &Value) -> Option<Literal> {
    let literal = match value {
        Value::Variable(_) => return None,
        Value::Null => Literal::new(LiteralKind::Null, "null"),
        Value::Number(n) if n.is_i64() || n.is_u64() => Literal::new(LiteralKind::Int, n.to_string()),
        Value::Number(n) => Literal::new(LiteralKind::Float, n.to_string()),
        Value::String(s) => Literal::new(LiteralKind::String, s.clone()),
        Value::Boolean(b) => Literal::new(LiteralKind::Boolean, b.to_string()),
        Value::Binary(_) => Literal::new(LiteralKind::String, ""),
        Value::Enum(name) => Literal::new(LiteralKind::Enum, name.as_str()),
        Value::List(_) => Literal::new(LiteralKind::List, value.to_string()),
        Value::Object(_) => Literal::new(LiteralKind::Object, value.to_string()),
    };
    Some(literal)
}

impl ScalarPositions {
    /// Index the input positions typed `scalar` in `sdl`.
    pub fn from_sdl(sdl: &str, scalar: &str) -> Result<Self, SchemaError> {
        let document = parse_schema(sdl).map_err(|e| SchemaError::Sdl(e.to_string()))?;
        let mut positions = Self {
            scalar: scalar.to_string(),
            query_root: "Query".into(),
            mutation_root: "Mutation".into(),
            subscription_root: "Subscription".into(),
            fields: HashMap::new(),
            input_fields: HashMap::new(),
        };

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema) => {
                    let schema = schema.node;
                    if let Some(query) = schema.query {
                        positions.query_root = query.node.to_string();
                    }
                    if let Some(mutation) = schema.mutation {
                        positions.mutation_root = mutation.node.to_string();
                    }
                    if let Some(subscription) = schema.subscription {
                        positions.subscription_root = subscription.node.to_string();
                    }
                },
                TypeSystemDefinition::Type(ty) => {
                    let ty = ty.node;
                    let name = ty.name.node.to_string();
                    match ty.kind {
                        TypeKind::Object(object) => positions.add_fields(name, object.fields),
                        TypeKind::Interface(interface) => {
                            positions.add_fields(name, interface.fields)
                        },
                        TypeKind::InputObject(input) => {
                            let fields = input
                                .fields
                                .into_iter()
                                .map(|f| (f.node.name.node.to_string(), f.node.ty.node))
                                .collect();
                            positions.input_fields.insert(name, fields);
                        },
                        _ => {},
                    }
                },
                TypeSystemDefinition::Directive(_) => {},
            }
        }
        Ok(positions)
    }

    fn add_fields(
        &mut self,
        type_name: String,
        fields: Vec<Positioned<FieldDefinition>>,
    ) {
        let shapes = fields
            .into_iter()
            .map(|field| {
                let field = field.node;
                let shape = FieldShape {
                    returns: named(&field.ty.node).to_string(),
                    args: field
                        .arguments
                        .into_iter()
                        .map(|a| (a.node.name.node.to_string(), a.node.ty.node))
                        .collect(),
                };
                (field.name.node.to_string(), shape)
            })
            .collect();
        self.fields.insert(type_name, shapes);
    }

    /// Number of arguments and input fields whose named type is the scalar.
    pub fn len(&self) -> usize {
        let args = self
            .fields
            .values()
            .flat_map(HashMap::values)
            .flat_map(|shape| shape.args.values());
        let inputs = self.input_fields.values().flat_map(HashMap::values);
        args.chain(inputs)
            .filter(|ty| named(ty) == self.scalar)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every inline literal in `document` that lands on the scalar.
    pub fn check_document(&self, document: &ExecutableDocument) -> ServerResult<()> {
        for (_, operation) in document.operations.iter() {
            let operation = &operation.node;
            for variable in &operation.variable_definitions {
                let variable = &variable.node;
                if let Some(default) = &variable.default_value {
                    self.check_value(
                        &default.node.clone().into_value(),
                        &variable.var_type.node,
                        variable.name.node.as_str(),
                        default.pos,
                    )?;
                }
            }

            let root = match operation.ty {
                OperationType::Query => &self.query_root,
                OperationType::Mutation => &self.mutation_root,
                OperationType::Subscription => &self.subscription_root,
            };
            let mut visited = HashSet::new();
            self.check_selection_set(
                document,
                root,
                &operation.selection_set.node,
                &mut visited,
            )?;
        }
        Ok(())
    }

    fn check_selection_set<'d>(
        &self,
        document: &'d ExecutableDocument,
        parent: &str,
        set: &'d SelectionSet,
        visited: &mut HashSet<&'d str>,
    ) -> ServerResult<()> {
        for item in &set.items {
            match &item.node {
                Selection::Field(field) => {
                    let field = &field.node;
                    // Unknown fields are left to validation.
                    let Some(shape) = self
                        .fields
                        .get(parent)
                        .and_then(|f| f.get(field.name.node.as_str()))
                    else {
                        continue;
                    };
                    for (name, value) in &field.arguments {
                        if let Some(ty) = shape.args.get(name.node.as_str()) {
                            self.check_value(&value.node, ty, name.node.as_str(), value.pos)?;
                        }
                    }
                    self.check_selection_set(
                        document,
                        &shape.returns,
                        &field.selection_set.node,
                        visited,
                    )?;
                },
                Selection::InlineFragment(fragment) => {
                    let fragment = &fragment.node;
                    let on = fragment
                        .type_condition
                        .as_ref()
                        .map_or(parent, |c| c.node.on.node.as_str());
                    self.check_selection_set(document, on, &fragment.selection_set.node, visited)?;
                },
                Selection::FragmentSpread(spread) => {
                    let name = &spread.node.fragment_name.node;
                    if !visited.insert(name.as_str()) {
                        continue;
                    }
                    if let Some(fragment) = document.fragments.get(name) {
                        let fragment = &fragment.node;
                        self.check_selection_set(
                            document,
                            fragment.type_condition.node.on.node.as_str(),
                            &fragment.selection_set.node,
                            visited,
                        )?;
                    }
                },
            }
        }
        Ok(())
    }

    fn check_value(&self, value: &Value, ty: &Type, arg: &str, pos: Pos) -> ServerResult<()> {
        match (&ty.base, value) {
            // Variables are coerced as input values; null is absence.
            (_, Value::Variable(_) | Value::Null) => Ok(()),
            (BaseType::List(inner), Value::List(items)) => items
                .iter()
                .try_for_each(|item| self.check_value(item, inner, arg, pos)),
            (BaseType::List(inner), single) => self.check_value(single, inner, arg, pos),
            (BaseType::Named(name), _) if name.as_str() == self.scalar => {
                let accepted = to_literal(value).is_none_or(|l| Date::parse_literal(&l).is_some());
                if accepted {
                    return Ok(());
                }
                warn!(
                    argument = arg,
                    literal = %value,
                    line = pos.line,
                    column = pos.column,
                    "rejected {} literal",
                    self.scalar
                );
                Err(ServerError::new(
                    format!(
                        "Invalid value for argument \"{arg}\", expected type \"{}\"",
                        self.scalar
                    ),
                    Some(pos),
                ))
            },
            (BaseType::Named(name), Value::Object(fields)) => {
                let Some(input) = self.input_fields.get(name.as_str()) else {
                    return Ok(());
                };
                for (key, field_value) in fields {
                    if let Some(field_ty) = input.get(key.as_str()) {
                        self.check_value(field_value, field_ty, key.as_str(), pos)?;
                    }
                }
                Ok(())
            },
            _ => Ok(()),
        }
    }
}

/// Schema extension that applies [`Date::parse_literal`] to inline literals.
pub struct DateLiteralGuard {
    positions: Arc<ScalarPositions>,
}

impl DateLiteralGuard {
    pub fn new(positions: ScalarPositions) -> Self {
        Self {
            positions: Arc::new(positions),
        }
    }
}

impl ExtensionFactory for DateLiteralGuard {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(DateLiteralGuardExtension {
            positions: Arc::clone(&self.positions),
        })
    }
}

struct DateLiteralGuardExtension {
    positions: Arc<ScalarPositions>,
}

#[async_trait::async_trait]
impl Extension for DateLiteralGuardExtension {
    async fn parse_query(
        &self,
        ctx: &ExtensionContext<'_>,
        query: &str,
        variables: &Variables,
        next: NextParseQuery<'_>,
    ) -> ServerResult<ExecutableDocument> {
        let document = next.run(ctx, query, variables).await?;
        self.positions.check_document(&document)?;
        Ok(document)
    }
}
