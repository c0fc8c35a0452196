//! Error mapping from store and resolution failures to GraphQL errors.

use crate::store::{DocumentError, StoreError};

/// Failures while assembling a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to index Date positions from schema SDL: {0}")]
    Sdl(String),
}

pub fn gql_err(msg: impl Into<String>) -> async_graphql::Error {
    async_graphql::Error::new(msg)
}

pub fn store_err(e: StoreError) -> async_graphql::Error {
    gql_err(e.to_string())
}

/// Error for an abstract-typed field whose value matched no object type.
pub fn unresolved_abstract(abstract_type: &str, field: &str) -> async_graphql::Error {
    gql_err(format!(
        "Abstract type \"{abstract_type}\" must resolve to an object type at runtime for field \"{field}\""
    ))
}

/// Map a failed document import onto the field that requested it.
pub fn document_err(e: DocumentError, abstract_type: &str, field: &str) -> async_graphql::Error {
    match e {
        DocumentError::Unresolved => unresolved_abstract(abstract_type, field),
        other => gql_err(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::scalars::DateError};

    #[test]
    fn unresolved_documents_name_the_field() {
        let err = document_err(DocumentError::Unresolved, "Message", "Mutation.importMessage");
        assert_eq!(
            err.message,
            "Abstract type \"Message\" must resolve to an object type at runtime for field \"Mutation.importMessage\""
        );
    }

    #[test]
    fn other_document_errors_keep_their_message() {
        let err = document_err(
            DocumentError::InvalidTime {
                field: "endTime",
                source: DateError::UnsupportedValueType,
            },
            "Message",
            "Mutation.importMessage",
        );
        assert!(err.message.starts_with("endTime: invalid Date value"), "{}", err.message);
        assert_eq!(
            store_err(StoreError::PostNotFound(9)).message,
            "Couldn't find post with id 9"
        );
    }
}
