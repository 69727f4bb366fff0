use chrono::NaiveDate;
use serde_json::Value;

use crate::models::mover::{Mover, RankedMover, RawMover};
use crate::providers::traits::DataSource;

/// Ranks a day's top-movers snapshot for the side panel.
///
/// Rows are rendered by descending `|priceChange|`, but each row keeps the
/// `#N` label of its position in the snapshot as received (after entries
/// without a price change are dropped). The two orders disagree on purpose;
/// ranking by magnitude is a planned upstream change, not a fix to make here.
pub struct MoversService;

impl MoversService {
    pub fn new() -> Self {
        Self
    }

    /// Fetch and rank the snapshot for `date`.
    ///
    /// Never fails: a missing snapshot, a fetch error or a malformed payload
    /// are logged and yield an empty panel.
    pub async fn load_movers(&self, source: &dyn DataSource, date: NaiveDate) -> Vec<RankedMover> {
        match source.fetch_movers(date).await {
            Ok(Some(payload)) => self.rank_payload(payload),
            Ok(None) => {
                log::warn!("No movers snapshot for {date} yet; leaving the panel empty");
                Vec::new()
            }
            Err(e) => {
                log::warn!("Failed to load movers for {date} from {}: {e}", source.name());
                Vec::new()
            }
        }
    }

    /// Validate a raw snapshot payload and rank it.
    pub fn rank_payload(&self, payload: Value) -> Vec<RankedMover> {
        let Value::Array(entries) = payload else {
            log::warn!("Movers snapshot is not a JSON array; ignoring it");
            return Vec::new();
        };

        let movers: Vec<Mover> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let raw: RawMover = match serde_json::from_value(entry) {
                    Ok(raw) => raw,
                    Err(e) => {
                        log::debug!("Skipping movers entry {idx}: not an object ({e})");
                        return None;
                    }
                };
                let mover = Mover::from_raw(raw);
                if mover.is_none() {
                    log::debug!("Skipping movers entry {idx}: no usable priceChange");
                }
                mover
            })
            .collect();

        self.rank(&movers)
    }

    /// Rank validated movers. `movers` itself is left untouched.
    pub fn rank(&self, movers: &[Mover]) -> Vec<RankedMover> {
        let mut order: Vec<usize> = (0..movers.len()).collect();
        // Stable: equal magnitudes keep their received order.
        order.sort_by(|&a, &b| {
            movers[b]
                .price_change
                .abs()
                .total_cmp(&movers[a].price_change.abs())
        });

        order
            .into_iter()
            .enumerate()
            .map(|(sorted_idx, original_idx)| RankedMover {
                display_rank: original_idx + 1,
                sort_rank: sorted_idx + 1,
                mover: movers[original_idx].clone(),
            })
            .collect()
    }
}

impl Default for MoversService {
    fn default() -> Self {
        Self::new()
    }
}
