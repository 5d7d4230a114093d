//! Section splitting for free-form generated Markdown

/// A heading the generation step is asked to emit, and the placeholder used
/// when that heading cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub marker: &'static str,
    pub sentinel: &'static str,
}

pub const RAW_MATERIALS: Section = Section {
    marker: "## Raw Materials",
    sentinel: "Could not parse raw materials.",
};

pub const COST_ESTIMATE: Section = Section {
    marker: "## Cost Estimate",
    sentinel: "Could not parse cost estimate.",
};

pub const ASCII_BLUEPRINT: Section = Section {
    marker: "## ASCII Blueprint",
    sentinel: "Could not parse ASCII blueprint.",
};

pub const SVG_BLUEPRINT: Section = Section {
    marker: "## SVG Blueprint",
    sentinel: "Could not parse SVG blueprint.",
};

pub const FINAL_BLUEPRINT: Section = Section {
    marker: "## Final Blueprint",
    sentinel: "Could not parse final blueprint.",
};

pub const PLAN_COMPARISON: Section = Section {
    marker: "## Plan Comparison",
    sentinel: "Could not parse plan comparison.",
};

/// Headings of the initial plan, in the order they must appear.
pub const INITIAL_PLAN_SECTIONS: [Section; 4] =
    [RAW_MATERIALS, COST_ESTIMATE, ASCII_BLUEPRINT, SVG_BLUEPRINT];

/// Headings of the final blueprint, in the order they must appear.
pub const FINAL_BLUEPRINT_SECTIONS: [Section; 2] = [FINAL_BLUEPRINT, PLAN_COMPARISON];

/// A line starting with one of the known markers.
#[derive(Debug)]
struct Heading {
    section: usize,
    start: usize,
    body_start: usize,
}

fn find_headings(text: &str, sections: &[Section]) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if let Some(section) = sections.iter().position(|s| line.starts_with(s.marker)) {
            headings.push(Heading {
                section,
                start: offset,
                body_start: offset + sections[section].marker.len(),
            });
        }
        offset += line.len();
    }

    headings
}

/// Split `text` into one string per section.
///
/// Each result is the trimmed text between the section's heading and the
/// next known heading (or the end of the text). A heading that is missing,
/// or that only appears before the previously matched heading, yields that
/// section's sentinel. Other sections are unaffected.
pub fn extract_sections<const N: usize>(text: &str, sections: &[Section; N]) -> [String; N] {
    let headings = find_headings(text, sections);

    let mut body_starts = [None; N];
    let mut cursor = 0;
    for (index, slot) in body_starts.iter_mut().enumerate() {
        if let Some(heading) = headings
            .iter()
            .find(|h| h.section == index && h.start >= cursor)
        {
            cursor = heading.body_start;
            *slot = Some(heading.body_start);
        }
    }

    std::array::from_fn(|index| match body_starts[index] {
        Some(body_start) => {
            let end = headings
                .iter()
                .map(|h| h.start)
                .find(|&start| start >= body_start)
                .unwrap_or(text.len());
            text[body_start..end].trim().to_string()
        }
        None => sections[index].sentinel.to_string(),
    })
}
