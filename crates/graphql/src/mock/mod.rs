//! Mock-data schema.
//!
//! Every value is generated on demand by a [`Mocker`]; nothing is stored.
//! Numbers fall inside the configured ranges, strings are short Chinese
//! titles, and list fields hold between `list_min` and `list_max` items.

mod words;

use std::sync::{Arc, Mutex};

use {
    async_graphql::{Context, Object, Result},
    chrono::{DateTime, Utc},
    quill_config::{DateFormat, MocksConfig},
    rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom},
};

use crate::{scalars::Date, types::Notice};

/// Random value source for the mock schema.
pub struct Mocker {
    config: MocksConfig,
    date_format: DateFormat,
    rng: Mutex<StdRng>,
}

impl Mocker {
    /// Seeded from `config.seed` when set, otherwise from the OS.
    pub fn new(config: MocksConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            date_format: DateFormat::default(),
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    pub fn int(&self) -> i32 {
        let (lo, hi) = ordered(self.config.int_min, self.config.int_max);
        self.with_rng(|rng| rng.random_range(lo..=hi))
    }

    pub fn float(&self) -> f64 {
        let (lo, hi) = ordered(self.config.float_min, self.config.float_max);
        if !(lo.is_finite() && hi.is_finite()) {
            return 0.0;
        }
        self.with_rng(|rng| rng.random_range(lo..=hi))
    }

    pub fn boolean(&self) -> bool {
        self.with_rng(|rng| rng.random_bool(0.5))
    }

    /// A title of 5 to 10 Chinese characters.
    pub fn title(&self) -> String {
        self.with_rng(|rng| {
            let len = rng.random_range(5..=10);
            (0..len)
                .filter_map(|_| words::TITLE_CHARS.choose(rng))
                .collect()
        })
    }

    /// A Chinese personal name: surname then given name.
    pub fn name(&self) -> String {
        self.with_rng(|rng| {
            let surname = words::SURNAMES.choose(rng).copied().unwrap_or_default();
            let given = words::GIVEN_NAMES.choose(rng).copied().unwrap_or_default();
            format!("{surname}{given}")
        })
    }

    /// An instant between the epoch and now.
    pub fn date(&self) -> Date {
        let now = Utc::now().timestamp_millis();
        let millis = self.with_rng(|rng| rng.random_range(0..=now));
        let instant = DateTime::from_timestamp_millis(millis).unwrap_or_default();
        Date::new(instant).with_format(self.date_format)
    }

    /// Length for a generated list, capped by a non-negative `limit`.
    pub fn list_len(&self, limit: Option<i32>) -> usize {
        let (lo, hi) = ordered(self.config.list_min, self.config.list_max);
        let len = self.with_rng(|rng| rng.random_range(lo..=hi));
        match limit.and_then(|l| usize::try_from(l).ok()) {
            Some(limit) => len.min(limit),
            None => len,
        }
    }
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

fn mocker<'a>(ctx: &Context<'a>) -> Result<&'a Arc<Mocker>> {
    ctx.data::<Arc<Mocker>>()
}

// ── Types ───────────────────────────────────────────────────────────────────
//
// Every field is nullable, as in the mock SDL; the resolvers never return
// null themselves. List items stay non-null.

pub struct MockUser {
    id: i32,
}

fn users(m: &Mocker, limit: Option<i32>) -> Vec<MockUser> {
    (0..m.list_len(limit))
        .map(|_| MockUser { id: m.int() })
        .collect()
}

fn posts(m: &Mocker, limit: Option<i32>) -> Vec<MockPost> {
    (0..m.list_len(limit))
        .map(|_| MockPost { id: m.int() })
        .collect()
}

#[Object(name = "User")]
impl MockUser {
    async fn id(&self) -> Option<i32> {
        Some(self.id)
    }

    async fn name(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(Some(mocker(ctx)?.name()))
    }

    async fn posts(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
    ) -> Result<Option<Vec<MockPost>>> {
        Ok(Some(posts(mocker(ctx)?, limit)))
    }
}

pub struct MockPost {
    id: i32,
}

#[Object(name = "Post")]
impl MockPost {
    async fn id(&self) -> Option<i32> {
        Some(self.id)
    }

    async fn title(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(Some(mocker(ctx)?.title()))
    }

    async fn views(&self, ctx: &Context<'_>) -> Result<Option<i32>> {
        Ok(Some(mocker(ctx)?.int()))
    }

    async fn author(&self, ctx: &Context<'_>) -> Result<Option<MockUser>> {
        Ok(Some(MockUser {
            id: mocker(ctx)?.int(),
        }))
    }
}

// ── Roots ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockQuery;

#[Object(name = "Query")]
impl MockQuery {
    async fn a_string(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(Some(mocker(ctx)?.title()))
    }

    async fn a_boolean(&self, ctx: &Context<'_>) -> Result<Option<bool>> {
        Ok(Some(mocker(ctx)?.boolean()))
    }

    async fn an_int(&self, ctx: &Context<'_>) -> Result<Option<i32>> {
        Ok(Some(mocker(ctx)?.int()))
    }

    /// A number in `[float_min, float_max]`.
    async fn a_float(&self, ctx: &Context<'_>) -> Result<Option<f64>> {
        Ok(Some(mocker(ctx)?.float()))
    }

    async fn my(&self, ctx: &Context<'_>) -> Result<Option<Vec<MockUser>>> {
        Ok(Some(users(mocker(ctx)?, None)))
    }

    /// The user with the requested id, or a random one.
    async fn author(&self, ctx: &Context<'_>, id: Option<i32>) -> Result<Option<MockUser>> {
        let id = match id {
            Some(id) => id,
            None => mocker(ctx)?.int(),
        };
        Ok(Some(MockUser { id }))
    }

    async fn top_posts(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
    ) -> Result<Option<Vec<MockPost>>> {
        Ok(Some(posts(mocker(ctx)?, limit)))
    }

    async fn notices(&self, ctx: &Context<'_>) -> Result<Option<Vec<Notice>>> {
        let m = mocker(ctx)?;
        Ok(Some(
            (0..m.list_len(None))
                .map(|_| Notice {
                    content: Some(m.title()),
                    notice_time: Some(m.date()),
                })
                .collect(),
        ))
    }
}

#[derive(Default)]
pub struct MockMutation;

#[Object(name = "Mutation")]
impl MockMutation {
    async fn add_user(&self, ctx: &Context<'_>) -> Result<Option<MockUser>> {
        Ok(Some(MockUser {
            id: mocker(ctx)?.int(),
        }))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> Mocker {
        Mocker::new(MocksConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    #[test]
    fn numbers_stay_in_range() {
        let m = seeded(7);
        for _ in 0..500 {
            assert!((100..=99_999).contains(&m.int()));
            let f = m.float();
            assert!((100.0..=99_999.0).contains(&f), "{f}");
        }
    }

    #[test]
    fn titles_are_five_to_ten_chinese_chars() {
        let m = seeded(1);
        for _ in 0..100 {
            let title = m.title();
            let n = title.chars().count();
            assert!((5..=10).contains(&n), "{title}");
            assert!(title.chars().all(|c| ('\u{4e00}'..='\u{9fff}').contains(&c)));
        }
        let name = m.name();
        assert!((2..=3).contains(&name.chars().count()), "{name}");
    }

    #[test]
    fn list_lengths_respect_bounds_and_limit() {
        let m = seeded(3);
        for _ in 0..200 {
            assert!((6..=12).contains(&m.list_len(None)));
            assert!(m.list_len(Some(2)) <= 2);
        }
        assert_eq!(m.list_len(Some(0)), 0);
        assert!(m.list_len(Some(-1)) >= 6);
    }

    #[test]
    fn same_seed_same_values() {
        let (a, b) = (seeded(42), seeded(42));
        let draws_a: Vec<_> = (0..10).map(|_| (a.int(), a.title())).collect();
        let draws_b: Vec<_> = (0..10).map(|_| (b.int(), b.title())).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn inverted_ranges_are_reordered() {
        let m = Mocker::new(MocksConfig {
            seed: Some(0),
            int_min: 10,
            int_max: 1,
            list_min: 3,
            list_max: 1,
            ..Default::default()
        });
        assert!((1..=10).contains(&m.int()));
        assert!((1..=3).contains(&m.list_len(None)));
    }

    #[test]
    fn dates_are_not_in_the_future() {
        let m = seeded(9).with_date_format(DateFormat::Iso8601);
        let date = m.date();
        assert!(date.instant() <= Utc::now());
        assert_eq!(date.format(), DateFormat::Iso8601);
    }
}
