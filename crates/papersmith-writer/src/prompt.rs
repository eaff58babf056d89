//! Grounding prompt construction.

use papersmith_ingestion::Fragment;

/// Number the evidence 1..N in the order given. The ordinals are local to one
/// prompt; they are not global fragment ids.
pub fn format_evidence(evidence: &[Fragment]) -> String {
    evidence
        .iter()
        .enumerate()
        .map(|(idx, f)| format!("[Source ID: {}]: {}\n\n", idx + 1, f.text()))
        .collect()
}

/// The single instruction sent to the generation service for one section.
pub fn build_section_prompt(topic: &str, section: &str, evidence: &[Fragment], length_hint: &str) -> String {
    let (evidence_rules, excerpts) = if evidence.is_empty() {
        (
            "1. No research excerpts are available for this section. Write cautiously and keep claims general.\n\
             2. Do not invent citations or bracketed source IDs.",
            "(none)\n".to_string(),
        )
    } else {
        (
            "1. Use the following excerpts from research papers as your sole source of evidence.\n\
             2. For every factual statement, cite the source using the provided ID in brackets, e.g., [1].",
            format_evidence(evidence),
        )
    };

    format!(
        "Write the **{section}** section for a two-page research paper on **{topic}**.\n\
         \n\
         You must ground every claim you make with direct evidence from the provided research excerpts. \
         Weave the citations seamlessly into the narrative.\n\
         \n\
         Instructions:\n\
         {evidence_rules}\n\
         3. Write authoritatively and concisely. This section should be {length_hint}.\n\
         4. Return only the body text: no section title and no sub-headings.\n\
         \n\
         Excerpts:\n\
         {excerpts}\n\
         Begin writing the {section} section now:"
    )
}
