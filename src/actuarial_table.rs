//! SOA binary actuarial-table reader.
//!
//! The file format is bit-exact and external (§4.2): a fixed-record `.ndx`
//! index of `(table_number, byte_offset)` pairs, and a `.dat` file of
//! variable-length TLV records (2-byte big-endian tag, 2-byte big-endian
//! length, payload) located by the index.
//!
//! `original_source/actuarial_table.{hpp,cpp}` -- the C++ implementation
//! proper -- was not present in the retrieval pack; this module is built
//! directly from SPEC_FULL.md §4.2's prose, in the stylistic idiom of the
//! teacher's `mt_config` submodules (a small parsing layer plus a facade
//! type with `values`/lookup methods), re-expressed over bytes instead of
//! XML/spreadsheets.

use crate::error::{Lmi7702Error, Result};

const TAG_NAME: u16 = 1;
const TAG_MIN_AGE: u16 = 2;
const TAG_MAX_AGE: u16 = 3;
const TAG_SELECT_PERIOD: u16 = 4;
const TAG_MAX_SELECT_AGE: u16 = 5;
const TAG_VALUES: u16 = 6;

/// One `(table_number, byte_offset)` record, fixed at 8 bytes: 4-byte
/// big-endian table number, 4-byte big-endian offset into the `.dat` file.
const INDEX_RECORD_SIZE: usize = 8;

/// A parsed `.ndx` file: sorted fixed-size records supporting binary
/// search by table number.
pub struct TableIndex<'a> {
    bytes: &'a [u8],
}

impl<'a> TableIndex<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() % INDEX_RECORD_SIZE != 0 {
            return Err(Lmi7702Error::structural(format!(
                "actuarial table index: length {} is not a multiple of the {}-byte record size",
                bytes.len(),
                INDEX_RECORD_SIZE
            )));
        }
        Ok(Self { bytes })
    }

    fn len(&self) -> usize {
        self.bytes.len() / INDEX_RECORD_SIZE
    }

    fn record(&self, i: usize) -> (u32, u32) {
        let base = i * INDEX_RECORD_SIZE;
        let table_number = u32::from_be_bytes(self.bytes[base..base + 4].try_into().unwrap());
        let offset = u32::from_be_bytes(self.bytes[base + 4..base + 8].try_into().unwrap());
        (table_number, offset)
    }

    /// Binary search for `table_number`, returning its byte offset into
    /// the companion `.dat` file.
    pub fn locate(&self, table_number: u32) -> Option<u64> {
        let mut lo = 0usize;
        let mut hi = self.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (number, offset) = self.record(mid);
            match number.cmp(&table_number) {
                std::cmp::Ordering::Equal => return Some(offset as u64),
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
            }
        }
        None
    }
}

/// The raw fields parsed from one table's TLV record stream.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: String,
    pub min_age: u32,
    pub max_age: u32,
    pub select_period: u32,
    pub max_select_age: u32,
    pub values: Vec<f64>,
}

impl RawTable {
    /// Parse one table's TLV record stream starting at `offset` within
    /// `dat`. Stops at the first record whose tag is `TAG_VALUES`, since
    /// a table's final record is always the rate array.
    pub fn parse(dat: &[u8], offset: u64) -> Result<Self> {
        let mut pos = offset as usize;
        let mut name = None;
        let mut min_age = None;
        let mut max_age = None;
        let mut select_period = 0u32;
        let mut max_select_age = 0u32;
        let mut values = None;

        loop {
            if pos + 4 > dat.len() {
                return Err(Lmi7702Error::structural(
                    "actuarial table data: truncated TLV header".to_string(),
                ));
            }
            let tag = u16::from_be_bytes(dat[pos..pos + 2].try_into().unwrap());
            let len = u16::from_be_bytes(dat[pos + 2..pos + 4].try_into().unwrap()) as usize;
            pos += 4;
            if pos + len > dat.len() {
                return Err(Lmi7702Error::structural(
                    "actuarial table data: TLV payload runs past end of buffer".to_string(),
                ));
            }
            let payload = &dat[pos..pos + len];
            pos += len;

            match tag {
                TAG_NAME => {
                    name = Some(
                        String::from_utf8(payload.to_vec())
                            .map_err(|e| Lmi7702Error::structural(e.to_string()))?,
                    );
                }
                TAG_MIN_AGE => min_age = Some(read_u32_be(payload)?),
                TAG_MAX_AGE => max_age = Some(read_u32_be(payload)?),
                TAG_SELECT_PERIOD => select_period = read_u32_be(payload)?,
                TAG_MAX_SELECT_AGE => max_select_age = read_u32_be(payload)?,
                TAG_VALUES => {
                    if len % 8 != 0 {
                        return Err(Lmi7702Error::structural(format!(
                            "actuarial table data: values payload length {len} is not a multiple of 8"
                        )));
                    }
                    values = Some(
                        payload
                            .chunks_exact(8)
                            .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
                            .collect::<Vec<f64>>(),
                    );
                    break;
                }
                other => {
                    return Err(Lmi7702Error::structural(format!(
                        "actuarial table data: unrecognized tag {other}"
                    )));
                }
            }
        }

        let min_age = min_age
            .ok_or_else(|| Lmi7702Error::structural("actuarial table data: missing min_age"))?;
        let max_age = max_age
            .ok_or_else(|| Lmi7702Error::structural("actuarial table data: missing max_age"))?;
        let values =
            values.ok_or_else(|| Lmi7702Error::structural("actuarial table data: missing values"))?;

        if min_age > max_age {
            return Err(Lmi7702Error::structural(format!(
                "actuarial table data: min_age {min_age} exceeds max_age {max_age}"
            )));
        }
        if select_period as u64 > 1 + (max_age - min_age) as u64 {
            return Err(Lmi7702Error::structural(format!(
                "actuarial table data: select_period {select_period} exceeds age span"
            )));
        }

        Ok(RawTable {
            name: name.unwrap_or_default(),
            min_age,
            max_age,
            select_period,
            max_select_age,
            values,
        })
    }
}

fn read_u32_be(payload: &[u8]) -> Result<u32> {
    if payload.len() != 4 {
        return Err(Lmi7702Error::structural(format!(
            "actuarial table data: expected 4-byte scalar, got {}",
            payload.len()
        )));
    }
    Ok(u32::from_be_bytes(payload.try_into().unwrap()))
}

/// A classified, queryable actuarial table: aggregate (`select_period ==
/// 0`) or select-and-ultimate.
pub struct ActuarialTable {
    raw: RawTable,
}

impl ActuarialTable {
    pub fn from_raw(raw: RawTable) -> Self {
        Self { raw }
    }

    /// Convenience constructor: locate `table_number` in `ndx` and parse
    /// its record out of `dat`.
    pub fn open(ndx: &[u8], dat: &[u8], table_number: u32) -> Result<Self> {
        let index = TableIndex::new(ndx)?;
        let offset = index.locate(table_number).ok_or_else(|| {
            Lmi7702Error::structural(format!("table number {table_number} not found in index"))
        })?;
        let raw = RawTable::parse(dat, offset)?;
        Ok(Self::from_raw(raw))
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn min_age(&self) -> u32 {
        self.raw.min_age
    }

    pub fn max_age(&self) -> u32 {
        self.raw.max_age
    }

    pub fn select_period(&self) -> u32 {
        self.raw.select_period
    }

    pub fn max_select_age(&self) -> u32 {
        self.raw.max_select_age
    }

    pub fn is_select_and_ultimate(&self) -> bool {
        self.raw.select_period > 0
    }

    fn check_lookup_preconditions(&self, issue_age: u32, length: u32) -> Result<()> {
        if issue_age < self.raw.min_age || issue_age > self.raw.max_age {
            return Err(Lmi7702Error::domain(format!(
                "issue_age {issue_age} outside table range [{}, {}]",
                self.raw.min_age, self.raw.max_age
            )));
        }
        let max_length = 1 + self.raw.max_age - issue_age;
        if length > max_length {
            return Err(Lmi7702Error::domain(format!(
                "length {length} exceeds max length {max_length} at issue age {issue_age}"
            )));
        }
        Ok(())
    }

    /// The ultimate (attained-age-indexed) rate at `age`, used once a
    /// select contract has worn off the select period.
    fn ultimate_rate(&self, age: u32) -> f64 {
        let ultimate_start = self.select_start_offset(self.raw.max_select_age);
        let idx = ultimate_start + self.raw.select_period as usize
            + (age - self.raw.min_age - self.raw.select_period) as usize;
        self.raw.values[idx.min(self.raw.values.len() - 1)]
    }

    /// Offset into `values` of the select row for `issue_age`: each issue
    /// age occupies exactly `select_period` columns in the select block,
    /// so this is the row stride (not `select_period + 1` -- the ultimate
    /// section starts immediately after the select block ends, with no
    /// extra column per row). This function is never called for aggregate
    /// tables (`values()`'s aggregate path indexes `raw.values` directly).
    fn select_start_offset(&self, issue_age: u32) -> usize {
        ((issue_age - self.raw.min_age) * self.raw.select_period) as usize
    }

    /// `values(issue_age, length)`: the `length` mortality rates starting
    /// at `issue_age`.
    ///
    /// For select tables with `issue_age > max_select_age`, walk the
    /// issue age back to `max_select_age` and step forward in the select
    /// matrix -- this is how "reenter" semantics arise naturally (§4.2).
    pub fn values(&self, issue_age: u32, length: u32) -> Result<Vec<f64>> {
        self.check_lookup_preconditions(issue_age, length)?;

        if !self.is_select_and_ultimate() {
            let start = (issue_age - self.raw.min_age) as usize;
            return Ok(self.raw.values[start..start + length as usize].to_vec());
        }

        let select_period = self.raw.select_period;
        let (effective_issue_age, duration_offset) = if issue_age > self.raw.max_select_age {
            (self.raw.max_select_age, issue_age - self.raw.max_select_age)
        } else {
            (issue_age, 0)
        };

        let base = self.select_start_offset(effective_issue_age);
        let mut out = Vec::with_capacity(length as usize);
        for t in 0..length {
            let duration = duration_offset + t;
            let attained_age = issue_age + t;
            if duration < select_period {
                out.push(self.raw.values[base + duration as usize]);
            } else {
                out.push(self.ultimate_rate(attained_age));
            }
        }
        Ok(out)
    }

    /// `reenter_never`: the standard select lookup from issue. Rejects use
    /// through the elaborated (inforce-aware) interface by construction --
    /// it has no inforce parameters to misuse.
    pub fn reenter_never(&self, issue_age: u32, length: u32) -> Result<Vec<f64>> {
        self.values(issue_age, length)
    }

    /// `reenter_at_inforce_duration`: treat the inforce duration as a new
    /// issue -- rates start at `issue_age + inforce_duration` with the
    /// select period restarting -- and zero-pad the leading
    /// `inforce_duration` positions.
    pub fn reenter_at_inforce_duration(
        &self,
        issue_age: u32,
        inforce_duration: u32,
        length: u32,
    ) -> Result<Vec<f64>> {
        if inforce_duration >= length {
            return Ok(vec![0.0; length as usize]);
        }
        let new_issue_age = issue_age + inforce_duration;
        let remaining = length - inforce_duration;
        let tail = self.values(new_issue_age, remaining)?;
        let mut out = vec![0.0; inforce_duration as usize];
        out.extend(tail);
        Ok(out)
    }

    /// `reenter_upon_rate_reset`: shift the effective age by
    /// `reset_duration` (negative = age setback, clamped so the effective
    /// age never drops below `min_age`); zero-pad a positive
    /// `reset_duration`'s leading positions. Precondition:
    /// `reset_duration <= inforce_duration`.
    pub fn reenter_upon_rate_reset(
        &self,
        issue_age: u32,
        inforce_duration: u32,
        reset_duration: i32,
        length: u32,
    ) -> Result<Vec<f64>> {
        if reset_duration > inforce_duration as i32 {
            return Err(Lmi7702Error::domain(format!(
                "reset_duration {reset_duration} exceeds inforce_duration {inforce_duration}"
            )));
        }

        let effective_issue_age = {
            let shifted = issue_age as i32 + reset_duration;
            shifted.max(self.raw.min_age as i32) as u32
        };

        if reset_duration >= 0 {
            let pad = reset_duration as u32;
            if pad >= length {
                return Ok(vec![0.0; length as usize]);
            }
            let remaining = length - pad;
            let tail = self.values(effective_issue_age, remaining)?;
            let mut out = vec![0.0; pad as usize];
            out.extend(tail);
            Ok(out)
        } else {
            self.values(effective_issue_age, length)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tlv_u32(tag: u16, value: u32) -> Vec<u8> {
        let mut out = tag.to_be_bytes().to_vec();
        out.extend(4u16.to_be_bytes());
        out.extend(value.to_be_bytes());
        out
    }

    fn tlv_name(name: &str) -> Vec<u8> {
        let mut out = TAG_NAME.to_be_bytes().to_vec();
        out.extend((name.len() as u16).to_be_bytes());
        out.extend(name.as_bytes());
        out
    }

    fn tlv_values(values: &[f64]) -> Vec<u8> {
        let mut out = TAG_VALUES.to_be_bytes().to_vec();
        out.extend(((values.len() * 8) as u16).to_be_bytes());
        for v in values {
            out.extend(v.to_le_bytes());
        }
        out
    }

    fn build_aggregate_table_bytes(name: &str, min_age: u32, max_age: u32, values: &[f64]) -> Vec<u8> {
        let mut out = tlv_name(name);
        out.extend(tlv_u32(TAG_MIN_AGE, min_age));
        out.extend(tlv_u32(TAG_MAX_AGE, max_age));
        out.extend(tlv_values(values));
        out
    }

    #[test]
    fn parses_aggregate_table_and_looks_up_values() {
        let values = [0.001, 0.002, 0.003, 0.004, 0.005];
        let bytes = build_aggregate_table_bytes("test aggregate", 1, 5, &values);
        let raw = RawTable::parse(&bytes, 0).unwrap();
        assert_eq!(raw.min_age, 1);
        assert_eq!(raw.max_age, 5);
        assert_eq!(raw.select_period, 0);

        let table = ActuarialTable::from_raw(raw);
        assert!(!table.is_select_and_ultimate());
        let looked_up = table.values(2, 3).unwrap();
        assert_eq!(looked_up, vec![0.002, 0.003, 0.004]);
    }

    #[test]
    fn rejects_length_exceeding_table_range() {
        let values = [0.001, 0.002, 0.003];
        let bytes = build_aggregate_table_bytes("small", 1, 3, &values);
        let raw = RawTable::parse(&bytes, 0).unwrap();
        let table = ActuarialTable::from_raw(raw);
        assert!(table.values(2, 5).is_err());
    }

    #[test]
    fn index_binary_search_locates_table() {
        // two records: table 42 at offset 0, table 256 at offset 1000
        let mut ndx = Vec::new();
        ndx.extend(42u32.to_be_bytes());
        ndx.extend(0u32.to_be_bytes());
        ndx.extend(256u32.to_be_bytes());
        ndx.extend(1000u32.to_be_bytes());
        let index = TableIndex::new(&ndx).unwrap();
        assert_eq!(index.locate(42), Some(0));
        assert_eq!(index.locate(256), Some(1000));
        assert_eq!(index.locate(7), None);
    }

    /// select_period=3, min_age=10, max_age=20, max_select_age=15: 6 issue
    /// ages (10..=15), 3 select columns each (stride = select_period, not
    /// select_period + 1 -- the ultimate section starts immediately after
    /// the select block, with no extra column per row), then an ultimate
    /// tail for ages 13..=20.
    fn build_select_and_ultimate_table_bytes() -> Vec<u8> {
        let select_period = 3u32;
        let min_age = 10u32;
        let max_age = 20u32;
        let max_select_age = 15u32;
        let mut values = Vec::new();
        for issue_age in min_age..=max_select_age {
            for d in 0..select_period {
                values.push(0.001 * (issue_age - min_age) as f64 + 0.0001 * d as f64);
            }
        }
        for age in (min_age + select_period)..=max_age {
            values.push(0.01 + 0.001 * (age - min_age) as f64);
        }

        let mut bytes = tlv_name("select test");
        bytes.extend(tlv_u32(TAG_MIN_AGE, min_age));
        bytes.extend(tlv_u32(TAG_MAX_AGE, max_age));
        bytes.extend(tlv_u32(TAG_SELECT_PERIOD, select_period));
        bytes.extend(tlv_u32(TAG_MAX_SELECT_AGE, max_select_age));
        bytes.extend(tlv_values(&values));
        bytes
    }

    #[test]
    fn select_lookup_matches_hand_computed_select_and_ultimate_rates() {
        let raw = RawTable::parse(&build_select_and_ultimate_table_bytes(), 0).unwrap();
        let table = ActuarialTable::from_raw(raw);
        assert!(table.is_select_and_ultimate());

        // issue age 12, duration 0-2 are select-column rates (row stride 3,
        // starting at (12-10)*3 = 6); duration 3-4 have worn off the
        // 3-year select period and fall back to the ultimate rate at
        // attained age 15 and 16 respectively.
        let looked_up = table.values(12, 5).unwrap();
        let expected = [0.0020, 0.0021, 0.0022, 0.015, 0.016];
        for (actual, expected) in looked_up.iter().zip(expected) {
            assert_abs_diff_eq!(actual, &expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn select_and_ultimate_reenter_at_inforce_duration_zero_pads_and_matches_rates() {
        let raw = RawTable::parse(&build_select_and_ultimate_table_bytes(), 0).unwrap();
        let table = ActuarialTable::from_raw(raw);
        assert!(table.is_select_and_ultimate());

        let padded = table.reenter_at_inforce_duration(12, 2, 5).unwrap();
        assert_eq!(padded.len(), 5);
        assert_eq!(padded[0], 0.0);
        assert_eq!(padded[1], 0.0);

        // The tail is the select lookup for a contract issued at 12 + 2 =
        // 14, durations 0-2: row stride 3 starting at (14-10)*3 = 12.
        let expected_tail = [0.0040, 0.0041, 0.0042];
        for (actual, expected) in padded[2..].iter().zip(expected_tail) {
            assert_abs_diff_eq!(actual, &expected, epsilon = 1e-12);
        }
    }
}
