//! Extraction of constant categories from the API text documentation.
//!
//! Only the "Global Variables" region is read. Within it, every `h5.` header
//! opens a category and the `* NAME` bullets directly under it are its
//! constants. Everything else in the region is skipped.
use crate::config::{DocumentMarkers, DuplicatePolicy};
use crate::error::{PipelineError, PipelineResult};
use crate::model::Category;
use regex::Regex;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekStart,
    InSection,
    InItems,
    Done,
}

pub struct DocumentScanner<'a> {
    markers: &'a DocumentMarkers,
    header: Regex,
    on_duplicate_label: DuplicatePolicy,
}

impl<'a> DocumentScanner<'a> {
    pub fn new(
        markers: &'a DocumentMarkers,
        on_duplicate_label: DuplicatePolicy,
    ) -> PipelineResult<Self> {
        let pattern = format!("{}(?P<label>.*)$", regex::escape(&markers.header_prefix));
        let header = Regex::new(&pattern).map_err(|err| {
            PipelineError::InvalidConfig(format!("header prefix {:?}: {err}", markers.header_prefix))
        })?;
        Ok(Self {
            markers,
            header,
            on_duplicate_label,
        })
    }

    /// Scan `content` (read from `path`) into categories in document order.
    pub fn scan(&self, path: &Path, content: &str) -> PipelineResult<Vec<Category>> {
        let mut state = ScanState::SeekStart;
        let mut categories: Vec<Category> = Vec::new();
        let mut current: Option<Category> = None;
        let mut seen_labels: BTreeMap<String, usize> = BTreeMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_number = idx + 1;
            let line = strip_terminators(raw);

            if state == ScanState::InItems {
                if let Some(name) = line.strip_prefix(self.markers.bullet_prefix.as_str()) {
                    let name = strip_terminators(name);
                    if name.is_empty() {
                        return Err(PipelineError::malformed(
                            path,
                            format!("empty constant name on line {line_number}"),
                        ));
                    }
                    if let Some(category) = current.as_mut() {
                        category.push(name);
                    }
                    continue;
                }
                // A non-bullet line closes the category and is re-examined below.
                if let Some(category) = current.take() {
                    close_category(category, &mut categories);
                }
                state = ScanState::InSection;
            }

            match state {
                ScanState::SeekStart => {
                    if line.contains(self.markers.start.as_str()) {
                        state = ScanState::InSection;
                    }
                }
                ScanState::InSection => {
                    if self.is_global_subheader(line) {
                        continue;
                    }
                    if line.contains(self.markers.end.as_str()) {
                        state = ScanState::Done;
                        break;
                    }
                    if let Some(label) = self.header_label(line) {
                        self.note_label(path, label, line_number, &mut seen_labels)?;
                        current = Some(Category::new(label));
                        state = ScanState::InItems;
                    }
                }
                ScanState::InItems | ScanState::Done => {}
            }
        }

        match state {
            ScanState::Done => Ok(categories),
            ScanState::SeekStart => Err(PipelineError::malformed(
                path,
                format!("start marker {:?} not found", self.markers.start),
            )),
            ScanState::InSection | ScanState::InItems => Err(PipelineError::malformed(
                path,
                format!("end marker {:?} not found", self.markers.end),
            )),
        }
    }

    fn is_global_subheader(&self, line: &str) -> bool {
        let marker = self.markers.global_subheader.as_str();
        !marker.is_empty() && line.contains(marker)
    }

    fn header_label<'l>(&self, line: &'l str) -> Option<&'l str> {
        let captures = self.header.captures(line)?;
        captures.name("label").map(|m| strip_terminators(m.as_str()))
    }

    fn note_label(
        &self,
        path: &Path,
        label: &str,
        line_number: usize,
        seen: &mut BTreeMap<String, usize>,
    ) -> PipelineResult<()> {
        let Some(first_line) = seen.get(label).copied() else {
            seen.insert(label.to_string(), line_number);
            return Ok(());
        };
        match self.on_duplicate_label {
            DuplicatePolicy::Fail => Err(PipelineError::DuplicateLabel {
                path: path.to_path_buf(),
                label: label.to_string(),
            }),
            DuplicatePolicy::Warn => {
                tracing::warn!(
                    label,
                    first_line,
                    line = line_number,
                    "duplicate category label kept as a separate category"
                );
                Ok(())
            }
        }
    }
}

fn close_category(category: Category, categories: &mut Vec<Category>) {
    tracing::debug!(
        label = %category.label,
        constants = category.constants.len(),
        "category scanned"
    );
    categories.push(category);
}

fn strip_terminators(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}

/// Check that no constant name is listed twice across all categories.
///
/// The ordinal map is keyed by name alone, so a repeated name always resolves
/// to the same ordinal wherever it appears.
pub fn check_constant_names(
    path: &Path,
    categories: &[Category],
    policy: DuplicatePolicy,
) -> PipelineResult<()> {
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
    for category in categories {
        for entry in &category.constants {
            let first = match owners.entry(entry.name.as_str()) {
                Entry::Vacant(slot) => {
                    slot.insert(category.label.as_str());
                    continue;
                }
                Entry::Occupied(slot) => *slot.get(),
            };
            match policy {
                DuplicatePolicy::Fail => {
                    return Err(PipelineError::DuplicateConstant {
                        path: path.to_path_buf(),
                        name: entry.name.clone(),
                        first: first.to_string(),
                        second: category.label.clone(),
                    });
                }
                DuplicatePolicy::Warn => tracing::warn!(
                    name = %entry.name,
                    first,
                    second = %category.label,
                    "constant listed in more than one category"
                ),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConstantEntry;

    const DOC: &str = "h2. Global Variables\nh5. Colors\n* RED\n* GREEN\nh2. Game API\n";

    fn scan_with(content: &str, policy: DuplicatePolicy) -> PipelineResult<Vec<Category>> {
        let markers = DocumentMarkers::default();
        let scanner = DocumentScanner::new(&markers, policy).expect("build scanner");
        scanner.scan(Path::new("doc.txt"), content)
    }

    fn scan(content: &str) -> PipelineResult<Vec<Category>> {
        scan_with(content, DuplicatePolicy::Warn)
    }

    fn names(category: &Category) -> Vec<&str> {
        category.constants.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn scans_single_category() {
        let categories = scan(DOC).expect("scan");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].label, "Colors");
        assert_eq!(
            categories[0].constants,
            vec![
                ConstantEntry {
                    name: "RED".to_string(),
                    position: 0
                },
                ConstantEntry {
                    name: "GREEN".to_string(),
                    position: 1
                },
            ]
        );
    }

    #[test]
    fn skips_global_subheader_and_prose() {
        let content = "\
intro text
h2. Global Variables
h5. Global
some prose
h5. ActionBarSlotType
* ACTION_TYPE_NOTHING
* ACTION_TYPE_ABILITY
a line between sections
h5. Alliance
* ALLIANCE_NONE
h2. Game API
h5. NotACategory
* NOT_A_CONSTANT
";
        let categories = scan(content).expect("scan");
        let labels: Vec<&str> = categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["ActionBarSlotType", "Alliance"]);
        assert_eq!(
            names(&categories[0]),
            vec!["ACTION_TYPE_NOTHING", "ACTION_TYPE_ABILITY"]
        );
        assert_eq!(names(&categories[1]), vec!["ALLIANCE_NONE"]);
    }

    #[test]
    fn header_directly_after_bullets_opens_next_category() {
        let content = "h2. Global Variables\nh5. A\n* A1\nh5. B\n* B1\n* B2\nh2. Game API\n";
        let categories = scan(content).expect("scan");
        assert_eq!(categories.len(), 2);
        assert_eq!(names(&categories[1]), vec!["B1", "B2"]);
        let positions: Vec<usize> = categories[1].constants.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn end_marker_directly_after_bullets_finishes_scan() {
        let categories = scan(DOC).expect("scan");
        assert_eq!(names(&categories[0]), vec!["RED", "GREEN"]);
    }

    #[test]
    fn strips_crlf_terminators() {
        let content = "h2. Global Variables\r\nh5. Colors\r\n* RED\r\n* GREEN\r\nh2. Game API\r\n";
        let categories = scan(content).expect("scan");
        assert_eq!(categories[0].label, "Colors");
        assert_eq!(names(&categories[0]), vec!["RED", "GREEN"]);
    }

    #[test]
    fn header_without_bullets_yields_empty_category() {
        let content = "h2. Global Variables\nh5. Empty\nh5. Colors\n* RED\nh2. Game API\n";
        let categories = scan(content).expect("scan");
        assert_eq!(categories.len(), 2);
        assert!(categories[0].constants.is_empty());
    }

    #[test]
    fn missing_start_marker_is_malformed() {
        let err = scan("h5. Colors\n* RED\n").expect_err("no start marker");
        assert!(matches!(err, PipelineError::MalformedDocument { .. }));
        assert!(err.to_string().contains("Global Variables"));
        assert!(err.to_string().contains("doc.txt"));
    }

    #[test]
    fn missing_end_marker_is_malformed() {
        let err = scan("h2. Global Variables\nh5. Colors\n* RED\n").expect_err("no end marker");
        assert!(matches!(err, PipelineError::MalformedDocument { .. }));
        assert!(err.to_string().contains("Game API"));
    }

    #[test]
    fn end_of_input_between_sections_is_malformed() {
        let err = scan("h2. Global Variables\nh5. Colors\n* RED\n\nprose\n")
            .expect_err("no end marker after prose");
        match err {
            PipelineError::MalformedDocument { path, reason } => {
                assert_eq!(path, Path::new("doc.txt"));
                assert_eq!(reason, "end marker \"h2. Game API\" not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn end_of_input_after_start_marker_is_malformed() {
        let err = scan("h2. Global Variables\n").expect_err("nothing after start");
        assert!(matches!(
            err,
            PipelineError::MalformedDocument { ref reason, .. } if reason.contains("end marker")
        ));
    }

    #[test]
    fn empty_bullet_is_malformed() {
        let err = scan("h2. Global Variables\nh5. Colors\n* \nh2. Game API\n").expect_err("empty");
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn duplicate_labels_are_kept_under_warn() {
        let content = "h2. Global Variables\nh5. Colors\n* RED\nh5. Colors\n* BLUE\nh2. Game API\n";
        let categories = scan(content).expect("scan");
        assert_eq!(categories.len(), 2);
        assert_eq!(names(&categories[1]), vec!["BLUE"]);
    }

    #[test]
    fn duplicate_labels_fail_under_fail() {
        let content = "h2. Global Variables\nh5. Colors\n* RED\nh5. Colors\n* BLUE\nh2. Game API\n";
        let err = scan_with(content, DuplicatePolicy::Fail).expect_err("duplicate label");
        assert!(matches!(err, PipelineError::DuplicateLabel { ref label, .. } if label == "Colors"));
    }

    #[test]
    fn custom_markers_are_honored() {
        let markers = DocumentMarkers {
            start: "## Constants".to_string(),
            end: "## Functions".to_string(),
            global_subheader: String::new(),
            header_prefix: "### ".to_string(),
            bullet_prefix: "- ".to_string(),
        };
        let scanner = DocumentScanner::new(&markers, DuplicatePolicy::Warn).expect("scanner");
        let content = "## Constants\n### Shapes\n- CIRCLE\n- SQUARE\n## Functions\n";
        let categories = scanner.scan(Path::new("doc.md"), content).expect("scan");
        assert_eq!(categories[0].label, "Shapes");
        assert_eq!(names(&categories[0]), vec!["CIRCLE", "SQUARE"]);
    }

    #[test]
    fn category_count_matches_headers_in_fixture() {
        let content =
            std::fs::read_to_string("tests/data/esoui_api_doc.txt").expect("fixture missing");
        let categories = scan(&content).expect("scan fixture");
        let region = content
            .split("h2. Global Variables")
            .nth(1)
            .and_then(|rest| rest.split("h2. Game API").next())
            .expect("fixture region");
        let headers = region
            .lines()
            .filter(|line| line.contains("h5. ") && !line.contains("h5. Global"))
            .count();
        assert_eq!(categories.len(), headers);
        for category in &categories {
            for (idx, entry) in category.constants.iter().enumerate() {
                assert_eq!(entry.position, idx);
            }
        }
    }

    #[test]
    fn shared_constant_names_warn_or_fail() {
        let content = "h2. Global Variables\nh5. A\n* SHARED\nh5. B\n* SHARED\nh2. Game API\n";
        let categories = scan(content).expect("scan");
        check_constant_names(Path::new("doc.txt"), &categories, DuplicatePolicy::Warn)
            .expect("warn policy");
        let err = check_constant_names(Path::new("doc.txt"), &categories, DuplicatePolicy::Fail)
            .expect_err("fail policy");
        match err {
            PipelineError::DuplicateConstant {
                name,
                first,
                second,
                ..
            } => {
                assert_eq!(name, "SHARED");
                assert_eq!(first, "A");
                assert_eq!(second, "B");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
