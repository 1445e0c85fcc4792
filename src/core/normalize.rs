// raw extraction rows -> one semantic fact per dataflow occurrence
use tracing::debug;

use crate::core::error::ReflexionError;
use crate::core::types::{Direction, RawSmEntity, SmEntity};

/// Split a pipe-separated multi-value field: segments are trimmed, blanks dropped.
pub fn split_multi_value(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthMismatch {
    pub names: usize,
    pub directions: usize,
}

/// Dataflow names paired positionally with the direction derived from their method tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataflowPairs {
    pairs: Vec<(String, Direction)>,
}

impl DataflowPairs {
    /// Pairs `names[i]` with `tags[i]`. Unequal lengths are an error rather than
    /// a silent truncation to the shorter list.
    pub fn parse(raw_names: &str, raw_tags: &str) -> Result<Self, LengthMismatch> {
        let names = split_multi_value(raw_names);
        let tags = split_multi_value(raw_tags);

        if names.len() != tags.len() {
            return Err(LengthMismatch { names: names.len(), directions: tags.len() });
        }

        let pairs = names
            .into_iter()
            .zip(tags.iter().map(|t| Direction::from_method_tag(t)))
            .collect();
        Ok(Self { pairs })
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> + '_ {
        self.pairs.iter().map(|(n, d)| (n.as_str(), *d))
    }
}

fn fact(raw: &RawSmEntity, dataflow_name: &str, direction: Direction) -> SmEntity {
    SmEntity {
        entry_point: raw.entry_point.trim().to_string(),
        internal_call: raw.internal_call.trim().to_string(),
        external_call: raw.external_call.trim().to_string(),
        process_name: raw.process_name.trim().to_string(),
        dataflow_name: dataflow_name.to_string(),
        direction,
        entry_point_location: raw.entry_point_location.clone(),
        internal_call_location: raw.internal_call_location.clone(),
    }
}

/// Expand one raw row.
///
/// - blank name list -> exactly one `Unknown` fact (process with no observed dataflow)
/// - N names + N tags -> N facts, in list order
/// - N names + M tags (N != M) -> `MisalignedRow`
pub fn expand_row(row: usize, raw: &RawSmEntity) -> Result<Vec<SmEntity>, ReflexionError> {
    if raw.raw_dataflow_names.trim().is_empty() {
        return Ok(vec![fact(raw, "", Direction::Unknown)]);
    }

    let pairs = DataflowPairs::parse(&raw.raw_dataflow_names, &raw.raw_dataflow_method_names).map_err(
        |m| ReflexionError::MisalignedRow {
            row,
            entry_point: raw.entry_point.trim().to_string(),
            names: m.names,
            directions: m.directions,
        },
    )?;

    Ok(pairs.iter().map(|(name, dir)| fact(raw, name, dir)).collect())
}

pub fn expand_raw(raws: &[RawSmEntity]) -> Result<Vec<SmEntity>, ReflexionError> {
    let mut out = Vec::with_capacity(raws.len());
    for (row, raw) in raws.iter().enumerate() {
        out.extend(expand_row(row, raw)?);
    }
    debug!(rows = raws.len(), facts = out.len(), "expanded source model rows");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_raw(process: &str, names: &str, tags: &str) -> RawSmEntity {
        RawSmEntity {
            entry_point: " Api.Handle ".into(),
            internal_call: "Api.Send".into(),
            external_call: "Http.Post".into(),
            process_name: process.into(),
            raw_dataflow_names: names.into(),
            raw_dataflow_method_names: tags.into(),
            ..Default::default()
        }
    }

    #[test]
    fn two_names_two_tags_pair_by_position() {
        let facts = expand_row(0, &mk_raw("Api", "A|B", "Push|Pull")).unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!((facts[0].dataflow_name.as_str(), facts[0].direction), ("A", Direction::Push));
        assert_eq!((facts[1].dataflow_name.as_str(), facts[1].direction), ("B", Direction::Pull));
        assert_eq!(facts[0].entry_point, "Api.Handle");
    }

    #[test]
    fn blank_names_yield_single_unknown_fact() {
        let facts = expand_row(0, &mk_raw("Api", "   ", "Push")).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].direction, Direction::Unknown);
        assert_eq!(facts[0].dataflow_name, "");
        assert_eq!(facts[0].process_name, "Api");
    }

    #[test]
    fn empty_segments_are_dropped_before_pairing() {
        let facts = expand_row(0, &mk_raw("Api", " A || B |", "|Pull<Order>| push ")).unwrap();
        let got: Vec<_> = facts.iter().map(|f| (f.dataflow_name.as_str(), f.direction)).collect();
        assert_eq!(got, vec![("A", Direction::Pull), ("B", Direction::Push)]);
    }

    #[test]
    fn only_separators_expand_to_nothing() {
        let facts = expand_row(0, &mk_raw("Api", "| |", "")).unwrap();
        assert!(facts.is_empty());
    }

    #[test]
    fn misaligned_lists_are_rejected_with_row_context() {
        let err = expand_raw(&[mk_raw("Api", "A", "Push"), mk_raw("Api", "A|B", "Push")]).unwrap_err();
        assert_eq!(
            err,
            ReflexionError::MisalignedRow {
                row: 1,
                entry_point: "Api.Handle".into(),
                names: 2,
                directions: 1,
            }
        );
    }

    #[test]
    fn paired_values_report_both_lengths() {
        let m = DataflowPairs::parse("A|B|C", "Push").unwrap_err();
        assert_eq!(m, LengthMismatch { names: 3, directions: 1 });
        assert!(DataflowPairs::parse("", "").unwrap().is_empty());
    }
}
