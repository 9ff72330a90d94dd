use std::{fmt, ops::Range, str::FromStr};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitName {
    Train,
    Test,
}

impl SplitName {
    /// Base names of the (images, labels) IDX files for this split.
    pub fn file_names(self) -> (&'static str, &'static str) {
        match self {
            SplitName::Train => ("train-images-idx3-ubyte", "train-labels-idx1-ubyte"),
            SplitName::Test => ("t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SplitName::Train => "train",
            SplitName::Test => "test",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Absolute(i64),
    Percent(i64),
}

impl Bound {
    fn resolve(self, total: usize) -> usize {
        let total_i = total as i64;
        let offset = match self {
            Bound::Absolute(n) => n,
            Bound::Percent(p) => round_percent(total_i * p),
        };
        let pos = if offset < 0 { total_i + offset } else { offset };
        pos.clamp(0, total_i) as usize
    }
}

/// `scaled / 100` rounded to the nearest record, ties to even.
fn round_percent(scaled: i64) -> i64 {
    let (q, r) = (scaled.div_euclid(100), scaled.rem_euclid(100));
    if r > 50 || (r == 50 && q % 2 != 0) {
        q + 1
    } else {
        q
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Absolute(n) => write!(f, "{n}"),
            Bound::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// A split name with an optional slice, e.g. `train`, `train[:1000]`,
/// `test[10%:50%]` or `train[-100:]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSpec {
    pub name: SplitName,
    start: Option<Bound>,
    end: Option<Bound>,
}

impl SplitSpec {
    pub fn is_sliced(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    pub fn resolve(&self, total: usize) -> Range<usize> {
        let start = self.start.map_or(0, |b| b.resolve(total));
        let end = self.end.map_or(total, |b| b.resolve(total));
        start..end.max(start)
    }
}

impl FromStr for SplitSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, slice) = match s.find('[') {
            Some(open) => {
                let inner = s[open + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| Error::unavailable(format!("malformed split slice: {s:?}")))?;
                (&s[..open], Some(inner))
            }
            None => (s, None),
        };

        let name = match name {
            "train" => SplitName::Train,
            "test" => SplitName::Test,
            other => {
                return Err(Error::unavailable(format!(
                    "unknown split {other:?}, expected \"train\" or \"test\""
                )));
            }
        };

        let (start, end) = match slice {
            None => (None, None),
            Some(inner) => {
                let (a, b) = inner.split_once(':').ok_or_else(|| {
                    Error::unavailable(format!("split slice needs a ':' in {s:?}"))
                })?;
                (parse_bound(a, s)?, parse_bound(b, s)?)
            }
        };

        Ok(Self { name, start, end })
    }
}

impl fmt::Display for SplitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())?;
        if self.is_sliced() {
            f.write_str("[")?;
            if let Some(b) = self.start {
                write!(f, "{b}")?;
            }
            f.write_str(":")?;
            if let Some(b) = self.end {
                write!(f, "{b}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

fn parse_bound(raw: &str, spec: &str) -> Result<Option<Bound>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let bad = || Error::unavailable(format!("bad split bound {raw:?} in {spec:?}"));
    match raw.strip_suffix('%') {
        Some(pct) => {
            let p: i64 = pct.trim().parse().map_err(|_| bad())?;
            if !(-100..=100).contains(&p) {
                return Err(bad());
            }
            Ok(Some(Bound::Percent(p)))
        }
        None => Ok(Some(Bound::Absolute(raw.parse().map_err(|_| bad())?))),
    }
}
