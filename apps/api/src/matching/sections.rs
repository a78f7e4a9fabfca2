//! Heading-based section splitting for resumes and job descriptions.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionName {
    Experience,
    Projects,
    Skills,
    Education,
    Summary,
}

impl SectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Experience => "experience",
            SectionName::Projects => "projects",
            SectionName::Skills => "skills",
            SectionName::Education => "education",
            SectionName::Summary => "summary",
        }
    }
}

/// Importance of a job-description section when averaging per-section matches.
const SECTION_WEIGHTS: &[(&str, f64)] = &[
    ("experience", 1.0),
    ("projects", 0.9),
    ("skills", 0.7),
    ("education", 0.4),
    ("summary", 0.5),
];

const DEFAULT_SECTION_WEIGHT: f64 = 0.5;

pub fn section_weight(name: &str) -> f64 {
    SECTION_WEIGHTS
        .iter()
        .find(|(section, _)| *section == name)
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_SECTION_WEIGHT)
}

/// A line naming one of these anywhere in it opens a section.
static HEADING_PATTERNS: Lazy<Vec<(SectionName, Regex)>> = Lazy::new(|| {
    [
        (SectionName::Experience, r"(experience|work experience|employment)\b"),
        (SectionName::Projects, r"(projects?)\b"),
        (SectionName::Skills, r"(skills|technologies|tech stack)\b"),
        (SectionName::Education, r"(education|academics)\b"),
        (SectionName::Summary, r"(summary|objective|profile)\b"),
    ]
    .into_iter()
    .map(|(name, pattern)| {
        let line = format!(r"(?im)^.*{pattern}.*$");
        (name, Regex::new(&line).expect("section heading regex is valid"))
    })
    .collect()
});

/// A named, contiguous span of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub name: SectionName,
    pub text: &'a str,
}

/// Partitions text into sections, one per detected heading line, each running
/// until the next heading. Text before the first heading belongs to no section.
/// With no headings at all, the whole text is a single `summary` section.
pub fn split_sections(text: &str) -> Vec<Section<'_>> {
    let mut headings: Vec<(usize, SectionName)> = HEADING_PATTERNS
        .iter()
        .flat_map(|(name, pattern)| pattern.find_iter(text).map(move |m| (m.start(), *name)))
        .collect();
    headings.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.as_str().cmp(b.1.as_str())));

    // A line naming two sections opens one span; the name sorting last keeps it.
    let mut starts: Vec<(usize, SectionName)> = Vec::with_capacity(headings.len());
    for (start, name) in headings {
        match starts.last_mut() {
            Some(last) if last.0 == start => last.1 = name,
            _ => starts.push((start, name)),
        }
    }

    if starts.is_empty() {
        return vec![Section {
            name: SectionName::Summary,
            text,
        }];
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &(start, name))| {
            let end = starts.get(i + 1).map(|next| next.0).unwrap_or(text.len());
            Section {
                name,
                text: &text[start..end],
            }
        })
        .collect()
}
