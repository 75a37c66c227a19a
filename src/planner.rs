//
// planner.rs: Turn a valid table into per-channel ADC weight writes
//
// For each active row (D > 0 when weights differ, B > 0 when the
// activation differs) the row's WT1 spec is appended to the write
// sequence of every channel it names. A broadcast spec goes to every
// channel seen so far, or to the default pair of channels if it's the
// first spec in the table.
//

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::errors::ErrorCode;
use crate::table::Snapshot;
use crate::validator::Mode;
use crate::wt1::{self, ChannelSpec};

// Channels a broadcast spec targets before any channel has been named.
pub const DEFAULT_CHANNELS: [u32; 2] = [0, 1];

// One register write: put 'value' into the channel's slot for 'row'.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Write {
    pub row: usize,
    pub value: u8,
}

// Writes grouped by ADC channel, each in table row order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WritePlan {
    channels: BTreeMap<u32, Vec<Write>>,
}

impl WritePlan {
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channels(&self) -> impl Iterator<Item = u32> + '_ {
        self.channels.keys().copied()
    }

    pub fn writes(&self, channel: u32) -> &[Write] {
        self.channels.get(&channel).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Write])> + '_ {
        self.channels.iter().map(|(c, w)| (*c, w.as_slice()))
    }

    // Total number of writes over all channels.
    pub fn len(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    fn push(&mut self, channel: u32, write: Write) {
        self.channels.entry(channel).or_insert_with(Vec::new).push(write);
    }
}

fn is_active(mode: Mode, b: i64, d: i64) -> bool {
    match mode {
        Mode::DifferingWeights => d > 0,
        Mode::DifferingActivation => b > 0,
        Mode::Invalid => false,
    }
}

// Build the write plan for a snapshot in the given mode. Rows without a
// usable spec are skipped rather than trusted to have been validated.
// An empty plan is reported as NothingToWrite.
pub fn plan(snapshot: &Snapshot, mode: Mode) -> Result<WritePlan, ErrorCode> {
    let mut res = WritePlan::default();
    let mut seen = BTreeSet::<u32>::new();

    for (row, entry) in snapshot.rows().iter().enumerate() {
        if !is_active(mode, entry.b(), entry.d()) {
            continue;
        }

        let spec = match wt1::parse(&entry.wt1_spec) {
            Ok(Some(spec)) => spec,
            Ok(None) => {
                debug!("row {}: no WT1 spec, skipped", row);
                continue;
            }
            Err(e) => {
                warn!("row {}: unusable WT1 spec '{}': {}", row, entry.wt1_spec, e);
                continue;
            }
        };

        match spec {
            ChannelSpec::Broadcast(value) => {
                let targets: BTreeSet<u32> = if seen.is_empty() {
                    DEFAULT_CHANNELS.iter().copied().collect()
                } else {
                    seen.clone()
                };
                debug!("row {}: broadcast {} to channels {:?}", row, value, targets);
                for channel in targets {
                    res.push(channel, Write { row, value });
                    seen.insert(channel);
                }
            }
            ChannelSpec::PerChannel(map) => {
                debug!("row {}: per-channel {:?}", row, map);
                for (channel, value) in map {
                    res.push(channel, Write { row, value });
                    seen.insert(channel);
                }
            }
        }
    }

    if res.is_empty() {
        return Err(ErrorCode::NothingToWrite);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, MvmTable};

    fn writes(pairs: &[(usize, u8)]) -> Vec<Write> {
        pairs.iter().map(|(row, value)| Write { row: *row, value: *value }).collect()
    }

    fn scenario_a() -> MvmTable {
        let mut t = MvmTable::new();
        t.set_cell(0, Column::NoRowsAct, "576").unwrap();
        t.set_cell(3, Column::NoRowsWt0, "200").unwrap();
        t.set_cell(7, Column::NoRowsWt0, "376").unwrap();
        t.set_cell(3, Column::Wt1Spec, "5").unwrap();
        t.set_cell(7, Column::Wt1Spec, "3").unwrap();
        t
    }

    #[test]
    fn broadcast_uses_default_channels() {
        let plan = plan(&scenario_a().snapshot(), Mode::DifferingWeights).unwrap();
        assert_eq!(plan.channels().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(plan.writes(0), writes(&[(3, 5), (7, 3)]).as_slice());
        assert_eq!(plan.writes(1), writes(&[(3, 5), (7, 3)]).as_slice());
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn broadcast_follows_discovered_channels() {
        let mut t = scenario_a();
        t.set_cell(3, Column::Wt1Spec, "c2=1, c5=4").unwrap();
        let plan = plan(&t.snapshot(), Mode::DifferingWeights).unwrap();
        assert_eq!(plan.channels().collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(plan.writes(2), writes(&[(3, 1), (7, 3)]).as_slice());
        assert_eq!(plan.writes(5), writes(&[(3, 4), (7, 3)]).as_slice());
        assert!(plan.writes(0).is_empty());
    }

    #[test]
    fn per_channel_list_form() {
        let mut t = scenario_a();
        t.set_cell(3, Column::Wt1Spec, "7 5 3").unwrap();
        t.set_cell(7, Column::Wt1Spec, "c1=9").unwrap();
        let plan = plan(&t.snapshot(), Mode::DifferingWeights).unwrap();
        assert_eq!(plan.writes(0), writes(&[(3, 7)]).as_slice());
        assert_eq!(plan.writes(1), writes(&[(3, 5), (7, 9)]).as_slice());
        assert_eq!(plan.writes(2), writes(&[(3, 3)]).as_slice());
    }

    #[test]
    fn active_rows_follow_mode() {
        let mut t = MvmTable::new();
        t.set_cell(1, Column::NoRowsAct, "100").unwrap();
        t.set_cell(2, Column::NoRowsAct, "476").unwrap();
        t.set_cell(5, Column::NoRowsWt0, "576").unwrap();
        t.set_cell(1, Column::Wt1Spec, "2").unwrap();
        t.set_cell(5, Column::Wt1Spec, "6").unwrap();

        let act = plan(&t.snapshot(), Mode::DifferingActivation).unwrap();
        assert_eq!(act.writes(0), writes(&[(1, 2)]).as_slice());

        let wt = plan(&t.snapshot(), Mode::DifferingWeights).unwrap();
        assert_eq!(wt.writes(0), writes(&[(5, 6)]).as_slice());
    }

    #[test]
    fn bad_rows_are_skipped() {
        let mut t = scenario_a();
        t.set_cell(3, Column::Wt1Spec, "99").unwrap();
        let plan = plan(&t.snapshot(), Mode::DifferingWeights).unwrap();
        assert_eq!(plan.writes(0), writes(&[(7, 3)]).as_slice());
    }

    #[test]
    fn nothing_to_write() {
        let mut t = scenario_a();
        t.set_cell(3, Column::Wt1Spec, "").unwrap();
        t.set_cell(7, Column::Wt1Spec, "").unwrap();
        assert_eq!(
            plan(&t.snapshot(), Mode::DifferingWeights),
            Err(ErrorCode::NothingToWrite)
        );
        assert_eq!(
            plan(&scenario_a().snapshot(), Mode::Invalid),
            Err(ErrorCode::NothingToWrite)
        );
    }
}
