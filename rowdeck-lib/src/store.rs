//! Row collection and load lifecycle

use log::warn;

use crate::error::Error;
use crate::error::LoadError;
use crate::error::StoreError;
use crate::model::LoadStatus;
use crate::model::Row;
use crate::model::RowPayload;
use crate::model::SeedRow;
use crate::seed::Seeder;
use crate::source::DataSource;

/// A mutation produced by a form session, applied after the submit delay.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    /// Prepend a new row built from the payload.
    Add(RowPayload),
    /// Replace the row whose id matches the payload's.
    Update(RowPayload),
    /// Delete the row with this id.
    Remove(String),
}

/// The in-memory ordered row collection and its load status.
///
/// Two invariants hold after every operation: row ids are unique across the
/// collection, and the `no` values form the contiguous sequence `1..=N`
/// matching each row's position exactly.
///
/// All mutations are synchronous and atomic from the caller's perspective;
/// the store is meant to be owned by a single-threaded session. As a
/// defensive measure mutations are still rejected while the initial load is
/// pending, independent of any gating in the presentation layer.
///
/// # Example
///
/// ```
/// use rowdeck_lib::RowStore;
/// use rowdeck_lib::model::RowPayload;
///
/// let payload = RowPayload {
///     id: "1".into(),
///     name: "Ada".into(),
///     language: "English".into(),
///     bio: "First programmer".into(),
///     version: "1.0".into(),
///     created_date: "2024-05-01T12:00:00Z".parse().unwrap(),
/// };
///
/// let mut store = RowStore::new();
/// store.add(payload).unwrap();
/// assert_eq!(store.rows()[0].no, 1);
/// ```
#[derive(Debug, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    status: LoadStatus,
}

impl RowStore {
    /// Creates an empty store in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current load status.
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// The rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks a row up by id.
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    // =========================================================================
    // Load lifecycle
    // =========================================================================

    /// Marks the single-shot load as started (`Idle -> Pending`).
    ///
    /// The load runs once per session; any later call is rejected with
    /// [`StoreError::AlreadyStarted`].
    pub fn begin_load(&mut self) -> Result<(), StoreError> {
        if self.status != LoadStatus::Idle {
            return Err(StoreError::AlreadyStarted);
        }
        self.status = LoadStatus::Pending;
        Ok(())
    }

    /// Applies the outcome of the fetch started by [`begin_load`](Self::begin_load).
    ///
    /// On success the whole collection is replaced with the seeded rows and
    /// the row count is returned. On failure the collection is left
    /// untouched (empty) and the status becomes [`LoadStatus::Failed`].
    pub fn complete_load(
        &mut self,
        outcome: Result<Vec<SeedRow>, LoadError>,
        seeder: &mut Seeder,
    ) -> Result<usize, LoadError> {
        debug_assert!(self.status.is_pending(), "complete_load without begin_load");
        match outcome {
            Ok(seed_rows) => {
                self.rows = seeder.seed(seed_rows);
                self.status = LoadStatus::Succeeded;
                Ok(self.rows.len())
            }
            Err(error) => {
                self.status = LoadStatus::Failed;
                Err(error)
            }
        }
    }

    /// Runs the whole load lifecycle against a data source.
    ///
    /// Convenience composition of [`begin_load`](Self::begin_load), the
    /// fetch, and [`complete_load`](Self::complete_load). Shells that want
    /// to render while the fetch is in flight drive the three steps
    /// themselves.
    pub async fn load(
        &mut self,
        source: &dyn DataSource,
        seeder: &mut Seeder,
    ) -> Result<usize, Error> {
        self.begin_load()?;
        let outcome = source.fetch().await;
        Ok(self.complete_load(outcome, seeder)?)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Prepends a new row built from the payload.
    ///
    /// The new row takes `no = 1` and every pre-existing row shifts down by
    /// one. The payload is assumed well-formed (field validation happens in
    /// the form session); only the structural id-uniqueness invariant is
    /// enforced here.
    pub fn add(&mut self, payload: RowPayload) -> Result<(), StoreError> {
        self.guard_not_pending()?;
        if self.rows.iter().any(|row| row.id == payload.id) {
            return Err(StoreError::duplicate_id(payload.id));
        }
        self.rows.insert(0, payload.into_row(1));
        self.renumber();
        Ok(())
    }

    /// Replaces the row whose id matches the payload's, preserving its
    /// position and `no`.
    ///
    /// Returns `false` (and logs a warning) when no row matches.
    pub fn update(&mut self, payload: RowPayload) -> Result<bool, StoreError> {
        self.guard_not_pending()?;
        match self.rows.iter_mut().find(|row| row.id == payload.id) {
            Some(row) => {
                let no = row.no;
                *row = payload.into_row(no);
                Ok(true)
            }
            None => {
                warn!("update for unknown row id '{}' ignored", payload.id);
                Ok(false)
            }
        }
    }

    /// Deletes the row with the given id and renumbers the remaining rows
    /// contiguously from 1, keeping their relative order.
    ///
    /// Returns `false` (and logs a warning) when no row matches.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        self.guard_not_pending()?;
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        if self.rows.len() == before {
            warn!("remove for unknown row id '{id}' ignored");
            return Ok(false);
        }
        self.renumber();
        Ok(true)
    }

    /// Applies a command produced by the submit path.
    ///
    /// Returns whether a row was affected.
    pub fn apply(&mut self, command: StoreCommand) -> Result<bool, StoreError> {
        match command {
            StoreCommand::Add(payload) => self.add(payload).map(|()| true),
            StoreCommand::Update(payload) => self.update(payload),
            StoreCommand::Remove(id) => self.remove(&id),
        }
    }

    fn guard_not_pending(&self) -> Result<(), StoreError> {
        if self.status.is_pending() {
            return Err(StoreError::LoadInFlight);
        }
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.no = index as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::seed::Clock;
    use crate::source::StaticDataSource;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            "2025-06-01T00:00:00Z".parse().unwrap()
        }
    }

    /// Data source whose fetch always fails.
    struct BrokenSource;

    #[async_trait]
    impl DataSource for BrokenSource {
        async fn fetch(&self) -> Result<Vec<SeedRow>, LoadError> {
            Err(LoadError::parse("malformed body"))
        }
    }

    fn seeder() -> Seeder {
        Seeder::with_parts(Box::new(FixedClock), StdRng::seed_from_u64(0))
    }

    fn seed_row(id: &str, name: &str) -> SeedRow {
        SeedRow {
            id: id.into(),
            name: name.into(),
            language: "English".into(),
            bio: "bio".into(),
            version: "1.0".into(),
            created_date: None,
        }
    }

    fn payload(id: &str, name: &str) -> RowPayload {
        RowPayload {
            id: id.into(),
            name: name.into(),
            language: "English".into(),
            bio: "bio".into(),
            version: "1.0".into(),
            created_date: "2025-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn assert_invariants(store: &RowStore) {
        let mut seen = std::collections::HashSet::new();
        for (index, row) in store.rows().iter().enumerate() {
            assert!(seen.insert(row.id.clone()), "duplicate id {}", row.id);
            assert_eq!(row.no as usize, index + 1, "non-contiguous no at {index}");
        }
    }

    async fn loaded_store(rows: Vec<SeedRow>) -> RowStore {
        let mut store = RowStore::new();
        let source = StaticDataSource::new(rows);
        store.load(&source, &mut seeder()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn load_seeds_rows_in_received_order() {
        let store = loaded_store(vec![seed_row("1", "Ada"), seed_row("2", "Grace")]).await;
        assert_eq!(store.status(), LoadStatus::Succeeded);
        assert_eq!(store.len(), 2);
        assert_eq!(store.rows()[0].id, "1");
        assert_eq!(store.rows()[0].no, 1);
        assert_eq!(store.rows()[1].no, 2);
        assert_invariants(&store);
    }

    #[tokio::test]
    async fn failed_load_leaves_rows_untouched() {
        let mut store = RowStore::new();
        let error = store.load(&BrokenSource, &mut seeder()).await.unwrap_err();
        assert!(matches!(error, Error::Load(LoadError::Parse { .. })));
        assert_eq!(store.status(), LoadStatus::Failed);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn load_runs_once_per_session() {
        let mut store = loaded_store(vec![seed_row("1", "Ada")]).await;
        let source = StaticDataSource::new(vec![seed_row("2", "Grace")]);
        let error = store.load(&source, &mut seeder()).await.unwrap_err();
        assert!(matches!(error, Error::Store(StoreError::AlreadyStarted)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn mutations_are_rejected_while_pending() {
        let mut store = RowStore::new();
        store.begin_load().unwrap();
        assert_eq!(store.add(payload("1", "Ada")), Err(StoreError::LoadInFlight));
        assert_eq!(store.update(payload("1", "Ada")), Err(StoreError::LoadInFlight));
        assert_eq!(store.remove("1"), Err(StoreError::LoadInFlight));
    }

    #[tokio::test]
    async fn add_prepends_and_shifts_numbers() {
        let mut store = loaded_store(vec![seed_row("1", "Ada")]).await;
        store.add(payload("2", "Grace")).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.rows()[0].id, "2");
        assert_eq!(store.rows()[0].no, 1);
        assert_eq!(store.rows()[1].id, "1");
        assert_eq!(store.rows()[1].no, 2);
        assert_invariants(&store);
    }

    #[tokio::test]
    async fn add_rejects_duplicate_ids() {
        let mut store = loaded_store(vec![seed_row("1", "Ada")]).await;
        let error = store.add(payload("1", "Imposter")).unwrap_err();
        assert_eq!(error, StoreError::duplicate_id("1"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.rows()[0].name, "Ada");
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let mut store = loaded_store(vec![seed_row("1", "Ada"), seed_row("2", "Grace")]).await;
        assert!(store.update(payload("1", "Ada L.")).unwrap());
        assert_eq!(store.rows()[0].name, "Ada L.");
        assert_eq!(store.rows()[0].no, 1);
        assert_eq!(store.rows()[1].name, "Grace");
        assert_invariants(&store);
    }

    #[tokio::test]
    async fn update_of_unknown_id_reports_no_match() {
        let mut store = loaded_store(vec![seed_row("1", "Ada")]).await;
        assert!(!store.update(payload("missing", "Nobody")).unwrap());
        assert_eq!(store.rows()[0].name, "Ada");
    }

    #[tokio::test]
    async fn remove_renumbers_contiguously() {
        let mut store =
            loaded_store(vec![seed_row("1", "Ada"), seed_row("2", "Grace"), seed_row("3", "Edsger")])
                .await;
        assert!(store.remove("2").unwrap());
        assert_eq!(store.len(), 2);
        assert_eq!(store.rows()[0].id, "1");
        assert_eq!(store.rows()[0].no, 1);
        assert_eq!(store.rows()[1].id, "3");
        assert_eq!(store.rows()[1].no, 2);
        assert_invariants(&store);
    }

    #[tokio::test]
    async fn remove_of_unknown_id_reports_no_match() {
        let mut store = loaded_store(vec![seed_row("1", "Ada")]).await;
        assert!(!store.remove("missing").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn add_then_remove_scenario() {
        // The scenario sequence: seed one row, prepend a second, delete it.
        let mut store = loaded_store(vec![seed_row("1", "Ada")]).await;
        store.add(payload("2", "Grace")).unwrap();
        assert_eq!(
            store.rows().iter().map(|r| (r.id.as_str(), r.no)).collect::<Vec<_>>(),
            vec![("2", 1), ("1", 2)]
        );
        assert!(store.remove("2").unwrap());
        assert_eq!(
            store.rows().iter().map(|r| (r.id.as_str(), r.no)).collect::<Vec<_>>(),
            vec![("1", 1)]
        );
    }

    #[tokio::test]
    async fn invariants_hold_across_mixed_sequences() {
        let mut store = loaded_store((0..8).map(|i| seed_row(&i.to_string(), "row")).collect()).await;
        store.add(payload("a", "first")).unwrap();
        store.remove("3").unwrap();
        store.add(payload("b", "second")).unwrap();
        store.update(payload("a", "renamed")).unwrap();
        store.remove("b").unwrap();
        store.remove("nope").unwrap();
        assert_invariants(&store);
        assert_eq!(store.get("a").unwrap().name, "renamed");
    }

    #[tokio::test]
    async fn apply_dispatches_commands() {
        let mut store = loaded_store(vec![seed_row("1", "Ada")]).await;
        assert!(store.apply(StoreCommand::Add(payload("2", "Grace"))).unwrap());
        assert!(store.apply(StoreCommand::Update(payload("1", "Ada L."))).unwrap());
        assert!(store.apply(StoreCommand::Remove("2".into())).unwrap());
        assert!(!store.apply(StoreCommand::Remove("2".into())).unwrap());
        assert_invariants(&store);
    }
}
