//! Static faculty list and the `(parity, faculty, course) -> documents` table.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use super::date::WeekParity;

/// A faculty as shown on the registration keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faculty {
    pub name: &'static str,
    pub abbreviation: &'static str,
}

pub const FACULTIES: [Faculty; 7] = [
    Faculty { name: "Механический факультет", abbreviation: "МФ" },
    Faculty { name: "Строительный факультет", abbreviation: "СФ" },
    Faculty { name: "Факультет управления процессами перевозок", abbreviation: "ФУПП" },
    Faculty { name: "Факультет экономики и управления", abbreviation: "ФЭУ" },
    Faculty { name: "Электромеханический факультет", abbreviation: "ЭМФ" },
    Faculty { name: "Электротехнический факультет", abbreviation: "ЭТФ" },
    Faculty { name: "ДиА", abbreviation: "ДиА" },
];

impl Faculty {
    pub fn all() -> &'static [Faculty] {
        &FACULTIES
    }

    pub fn by_name(name: &str) -> Option<Faculty> {
        let name = name.trim();
        FACULTIES.iter().copied().find(|f| f.name == name)
    }
}

/// Where a timetable document lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScheduleSource {
    Remote(String),
    Local(PathBuf),
}

impl ScheduleSource {
    /// Remote for `http(s)://` addresses, otherwise a path under `base_dir`.
    pub fn parse(address: &str, base_dir: &Path) -> Self {
        let address = address.trim();
        if address.starts_with("http://") || address.starts_with("https://") {
            ScheduleSource::Remote(address.to_string())
        } else {
            ScheduleSource::Local(base_dir.join(address))
        }
    }

    /// Stable key for the grid cache.
    pub fn key(&self) -> String {
        match self {
            ScheduleSource::Remote(url) => url.clone(),
            ScheduleSource::Local(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Documents for one faculty/course in one week parity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub parity: WeekParity,
    pub faculty: String,
    pub course: u8,
    pub sources: Vec<ScheduleSource>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

type RawTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, OneOrMany>>>;

/// Every known timetable document, ordered odd week first, then by
/// faculty name and course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    entries: Vec<SourceEntry>,
}

impl SourceTable {
    pub fn new(mut entries: Vec<SourceEntry>) -> Self {
        entries.sort_by(|a, b| {
            (a.parity, &a.faculty, a.course).cmp(&(b.parity, &b.faculty, b.course))
        });
        Self { entries }
    }

    /// Parses the JSON form:
    /// `{"odd": {"<faculty>": {"<course>": "addr" | ["addr", ...]}}, "even": {...}}`.
    pub fn from_json(json: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawTable = serde_json::from_str(json).context("invalid schedule source table")?;

        let mut entries = Vec::new();
        for (parity, faculties) in raw {
            let parity = match parity.trim().to_lowercase().as_str() {
                "odd" => WeekParity::Odd,
                "even" => WeekParity::Even,
                other => return Err(anyhow!("unknown week parity '{}'", other)),
            };
            for (faculty, courses) in faculties {
                for (course, addresses) in courses {
                    let course: u8 = course
                        .trim()
                        .parse()
                        .map_err(|_| anyhow!("invalid course '{}' for {}", course, faculty))?;
                    let sources = addresses
                        .into_vec()
                        .iter()
                        .filter(|a| !a.trim().is_empty())
                        .map(|a| ScheduleSource::parse(a, base_dir))
                        .collect();
                    entries.push(SourceEntry {
                        parity,
                        faculty: faculty.trim().to_string(),
                        course,
                        sources,
                    });
                }
            }
        }

        Ok(Self::new(entries))
    }

    pub fn load(path: &Path, base_dir: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read schedule source table {}", path.display()))?;
        Self::from_json(&json, base_dir)
    }

    /// Documents for one faculty/course in one parity; empty if unknown.
    pub fn sources(&self, parity: WeekParity, faculty: &str, course: u8) -> &[ScheduleSource] {
        self.entries
            .iter()
            .find(|e| e.parity == parity && e.faculty == faculty && e.course == course)
            .map(|e| e.sources.as_slice())
            .unwrap_or(&[])
    }

    /// Every `(parity, source)` pair, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (WeekParity, &ScheduleSource)> {
        self.entries
            .iter()
            .flat_map(|e| e.sources.iter().map(move |s| (e.parity, s)))
    }

    /// Courses that have at least one document for `faculty`.
    pub fn courses(&self, faculty: &str) -> Vec<u8> {
        let mut courses: Vec<u8> = self
            .entries
            .iter()
            .filter(|e| e.faculty == faculty && !e.sources.is_empty())
            .map(|e| e.course)
            .collect();
        courses.sort_unstable();
        courses.dedup();
        courses
    }

    pub fn source_count(&self) -> usize {
        self.entries.iter().map(|e| e.sources.len()).sum()
    }
}
