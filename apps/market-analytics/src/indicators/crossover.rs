//! Moving-average crossover detection.

use serde::{Deserialize, Serialize};

use super::series::IndicatorSeries;

/// Direction of a crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrossDirection {
    /// Fast average crosses above the slow one.
    Golden,
    /// Fast average crosses below the slow one.
    Death,
}

/// A crossover event at a bar index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crossover {
    /// Bar index where the fast average is first strictly on the new side.
    pub index: usize,
    /// Crossover direction.
    pub direction: CrossDirection,
}

/// Find the bars where `fast - slow` changes sign.
///
/// Bars where the averages are equal are skipped, so touching without
/// crossing (`-1, 0, -1`) is not reported. An undefined bar resets the
/// comparison.
pub fn crossovers(fast: &IndicatorSeries, slow: &IndicatorSeries) -> Vec<Crossover> {
    let spread = fast.zip_with(slow, |f, s| f - s);
    let mut events = Vec::new();
    let mut last_above: Option<bool> = None;

    for (index, value) in spread.values().iter().enumerate() {
        match *value {
            None => last_above = None,
            Some(d) if d == 0.0 => {}
            Some(d) => {
                let above = d > 0.0;
                if last_above.is_some_and(|prev| prev != above) {
                    events.push(Crossover {
                        index,
                        direction: if above {
                            CrossDirection::Golden
                        } else {
                            CrossDirection::Death
                        },
                    });
                }
                last_above = Some(above);
            }
        }
    }

    events
}
