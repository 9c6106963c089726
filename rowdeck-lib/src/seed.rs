//! Seeding of fetched rows
//!
//! Turns the wire-shaped dataset into table rows: assigns the 1-based
//! display order and backfills missing creation dates with a pseudo-random
//! instant within the past year. The demo dataset carries no dates, so the
//! backfill only exists to make the seeded table look lived-in; both the
//! clock and the randomness are injectable so tests stay deterministic.

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::model::Row;
use crate::model::SeedRow;

/// Width of the backfill window, in seconds (one year).
const BACKFILL_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;

/// Time source abstraction.
///
/// Lets tests pin "now" to a fixed instant for seeding and id generation.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Assigns display order and backfills missing creation dates.
pub struct Seeder {
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl Seeder {
    /// Seeder on the system clock and OS-seeded randomness.
    pub fn new() -> Self {
        Self::with_parts(Box::new(SystemClock), StdRng::from_os_rng())
    }

    /// Seeder with an explicit clock and RNG, for deterministic tests.
    pub fn with_parts(clock: Box<dyn Clock>, rng: StdRng) -> Self {
        Self { clock, rng }
    }

    /// Turns fetched records into rows.
    ///
    /// Rows keep their received order; `no` becomes `index + 1`. Records
    /// that already carry a creation date keep it untouched.
    pub fn seed(&mut self, seed_rows: Vec<SeedRow>) -> Vec<Row> {
        seed_rows
            .into_iter()
            .enumerate()
            .map(|(index, seed)| {
                let created_date = match seed.created_date {
                    Some(instant) => instant,
                    None => self.backfill_date(),
                };
                Row {
                    no: index as u32 + 1,
                    id: seed.id,
                    name: seed.name,
                    language: seed.language,
                    bio: seed.bio,
                    version: seed.version,
                    created_date,
                }
            })
            .collect()
    }

    fn backfill_date(&mut self) -> DateTime<Utc> {
        let offset = self.rng.random_range(0..BACKFILL_WINDOW_SECS);
        self.clock.now() - Duration::seconds(offset)
    }
}

impl Default for Seeder {
    fn default() -> Self {
        Self::new()
    }
}
