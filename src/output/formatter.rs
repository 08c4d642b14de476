//! Output formatters for analysis results and history listings

use crate::config::OutputFormat;
use crate::database::HistoryRecord;
use crate::error::{Result, ResumeAnalyzerError};
use crate::processing::analyzer::AnalysisResult;
use crate::processing::skill_gap::Tier;
use crate::processing::text_processor::truncate_preview;
use askama::Template;
use colored::{Color, Colorize};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::path::Path;

const JOB_PREVIEW_GRAPHEMES: usize = 48;

// A4 portrait, Helvetica 10pt body
const PDF_PAGE_WIDTH_MM: f32 = 210.0;
const PDF_PAGE_HEIGHT_MM: f32 = 297.0;
const PDF_MARGIN_MM: f32 = 20.0;
const PDF_WRAP_COLUMNS: usize = 90;

/// Trait for rendering one analysis result
pub trait OutputFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Paginated text report rendered with the PDF built-in fonts
pub struct PdfFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
    pdf_formatter: PdfFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Analysis: {{ candidate }}</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #007acc; padding-bottom: 20px; }
        .score-badge { display: inline-block; padding: 6px 14px; border-radius: 20px; font-weight: bold; color: white; margin-left: 10px; }
        .score-excellent { background: #28a745; }
        .score-good { background: #17a2b8; }
        .score-fair { background: #ffc107; color: #000; }
        .score-poor { background: #dc3545; }
        .section { margin: 25px 0; }
        .section h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 10px; }
        .scores { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; }
        .score-item { background: #f8f9fa; padding: 15px; border-radius: 6px; border-left: 4px solid #007acc; }
        .present { color: #28a745; }
        .absent { color: #dc3545; }
        .tier-critical { border-left: 4px solid #dc3545; padding-left: 10px; }
        .tier-important { border-left: 4px solid #ffc107; padding-left: 10px; }
        .tier-optional { border-left: 4px solid #28a745; padding-left: 10px; }
        .suggestion { background: #f8f9fa; padding: 12px; margin: 10px 0; border-radius: 6px; border-left: 4px solid #17a2b8; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Resume Analysis: {{ candidate }}</h1>
            <p>Analyzed: {{ analyzed_at }}</p>
        </div>

        <div class="section">
            <h2>Scores</h2>
            <div class="scores">
                <div class="score-item">
                    <h4>ATS Match Score</h4>
                    <p><strong>{{ match_score }}%</strong> <span class="score-badge {{ match_class }}">{{ match_label }}</span></p>
                </div>
                <div class="score-item">
                    <h4>Resume Strength</h4>
                    <p><strong>{{ resume_strength }}%</strong> <span class="score-badge {{ strength_class }}">{{ strength_label }}</span></p>
                </div>
            </div>
        </div>

        <div class="section">
            <h2>Skills</h2>
            <p><strong>Matched:</strong> {{ matched_skills }}</p>
            <p><strong>Missing:</strong> {{ missing_skills }}</p>
        </div>

        <div class="section">
            <h2>Resume Sections</h2>
            <ul>
            {% for section in sections %}
                {% if section.present %}
                <li class="present">&#10003; {{ section.name }}</li>
                {% else %}
                <li class="absent">&#10007; {{ section.name }} (missing)</li>
                {% endif %}
            {% endfor %}
            </ul>
        </div>

        {% if !feedback.is_empty() %}
        <div class="section">
            <h2>Feedback</h2>
            <ul>
            {% for message in feedback %}
                <li>{{ message }}</li>
            {% endfor %}
            </ul>
        </div>
        {% endif %}

        <div class="section">
            <h2>Skill Gap Roadmap</h2>
            {% for tier in tiers %}
            <p class="tier-{{ tier.name }}"><strong>{{ tier.label }}:</strong> {{ tier.skills }}</p>
            {% endfor %}
        </div>

        {% if !suggestions.is_empty() %}
        <div class="section">
            <h2>Rewrite Suggestions</h2>
            {% for suggestion in suggestions %}
            <div class="suggestion">
                <h4>{{ suggestion.skill }} <small>({{ suggestion.section }}, {{ suggestion.source }})</small></h4>
                <p>{{ suggestion.text }}</p>
            </div>
            {% endfor %}
        </div>
        {% endif %}

        {% if include_metadata %}
        <div class="metadata">
            <p><strong>Resume words:</strong> {{ resume_word_count }} | <strong>Processing time:</strong> {{ processing_time }}ms</p>
            <p><strong>Job keywords:</strong> {{ job_keywords }}</p>
            <p>Generated by resume-analyzer v{{ version }}</p>
        </div>
        {% endif %}
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    include_metadata: bool,
    candidate: String,
    analyzed_at: String,
    match_score: u8,
    match_class: &'static str,
    match_label: &'static str,
    resume_strength: u8,
    strength_class: &'static str,
    strength_label: &'static str,
    matched_skills: String,
    missing_skills: String,
    sections: Vec<HtmlSection>,
    feedback: Vec<String>,
    tiers: Vec<HtmlTier>,
    suggestions: Vec<HtmlSuggestion>,
    resume_word_count: usize,
    processing_time: u64,
    job_keywords: String,
    version: &'static str,
}

struct HtmlSection {
    name: String,
    present: bool,
}

struct HtmlTier {
    name: &'static str,
    label: String,
    skills: String,
}

struct HtmlSuggestion {
    skill: String,
    section: String,
    source: String,
    text: String,
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn score_band(score: u8) -> (&'static str, &'static str) {
    match score {
        90..=100 => ("score-excellent", "Excellent"),
        75..=89 => ("score-good", "Good"),
        60..=74 => ("score-fair", "Fair"),
        _ => ("score-poor", "Poor"),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            75..=89 => ("GOOD", Color::BrightGreen),
            60..=74 => ("FAIR", Color::Yellow),
            40..=59 => ("WEAK", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn presence_marker(&self, present: bool) -> String {
        match (present, self.use_colors) {
            (true, true) => "✔".green().to_string(),
            (false, true) => "✘".red().to_string(),
            (true, false) => "[x]".to_string(),
            (false, false) => "[ ]".to_string(),
        }
    }

    /// Table of stored analyses, newest first
    pub fn format_history(&self, records: &[HistoryRecord]) -> String {
        let mut output = self.format_header("Analysis History", 1);

        if records.is_empty() {
            output.push_str("No analyses recorded yet.\n");
            return output;
        }

        for record in records {
            output.push_str(&format!(
                "#{:<4} {}  {:>3}% {}  {}\n",
                record.id,
                record.created_at.format("%Y-%m-%d %H:%M"),
                record.score,
                self.format_score_badge(record.score),
                self.colorize(&record.candidate_name, Color::Cyan)
            ));
            output.push_str(&format!(
                "      matched {} | missing {} | {} resume words\n",
                record.matched_skills.len(),
                record.missing_skills.len(),
                record.resume_words
            ));
            let job = record.job_description.split_whitespace().collect::<Vec<_>>().join(" ");
            output.push_str(&format!(
                "      {}\n",
                self.colorize(&truncate_preview(&job, JOB_PREVIEW_GRAPHEMES), Color::BrightBlack)
            ));
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("RESUME ANALYSIS: {}", result.candidate), 1));
        output.push_str(&format!(
            "Analyzed: {} | Processing time: {}ms\n",
            result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            result.processing_time_ms
        ));

        output.push_str(&self.format_header("Scores", 2));
        output.push_str(&format!(
            "ATS Match Score: {}% {}\n",
            result.match_score,
            self.format_score_badge(result.match_score)
        ));
        output.push_str(&format!(
            "Resume Strength: {}% {}\n",
            result.resume_strength,
            self.format_score_badge(result.resume_strength)
        ));

        output.push_str(&self.format_header("Skills", 2));
        output.push_str(&format!(
            "Matched ({}): {}\n",
            result.matched_skills.len(),
            self.colorize(&join_or_none(&result.matched_skills), Color::Green)
        ));
        output.push_str(&format!(
            "Missing ({}): {}\n",
            result.missing_skills.len(),
            self.colorize(&join_or_none(&result.missing_skills), Color::Red)
        ));

        output.push_str(&self.format_header("Resume Sections", 2));
        for (section, present) in result.sections.iter() {
            output.push_str(&format!(
                "  {} {}\n",
                self.presence_marker(present),
                capitalize(section.as_str())
            ));
        }

        if !result.feedback.is_empty() {
            output.push_str(&self.format_header("Feedback", 2));
            for message in &result.feedback {
                output.push_str(&format!("  • {}\n", self.colorize(message, Color::Yellow)));
            }
        }

        output.push_str(&self.format_header("Skill Gap Roadmap", 2));
        if result.skill_gap_roadmap.is_empty() {
            output.push_str(&self.colorize("No skill gaps against this job description.\n", Color::Green));
        } else {
            for (tier, skills) in result.skill_gap_roadmap.tiers() {
                let color = match tier {
                    Tier::Critical => Color::Red,
                    Tier::Important => Color::Yellow,
                    Tier::Optional => Color::BrightBlack,
                };
                output.push_str(&format!(
                    "  {:<10} {}\n",
                    self.colorize(&format!("{}:", capitalize(tier.label())), color),
                    join_or_none(skills)
                ));
            }
        }

        if !result.rewrite_suggestions.is_empty() {
            output.push_str(&self.format_header("Rewrite Suggestions", 2));
            for (i, suggestion) in result.rewrite_suggestions.iter().enumerate() {
                output.push_str(&format!(
                    "{}. {} {}\n",
                    i + 1,
                    self.colorize(&suggestion.skill, Color::Cyan),
                    self.colorize(
                        &format!("({}, {})", suggestion.recommended_section, suggestion.source.label()),
                        Color::BrightBlack
                    )
                ));
                output.push_str(&format!("   {}\n", suggestion.suggested_rewrite));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!("Resume skills: {}\n", join_or_none(&result.resume_skills)));
            output.push_str(&format!("Job skills: {}\n", join_or_none(&result.job_skills)));
            output.push_str(&format!("Job keywords: {}\n", join_or_none(&result.job_keywords)));
            output.push_str(&format!("Resume words: {}\n", result.resume_word_count));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn format_history(&self, records: &[HistoryRecord]) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(records)?)
        } else {
            Ok(serde_json::to_string(records)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(result)?)
        } else {
            Ok(serde_json::to_string(result)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String> {
        let mut output = format!("# Resume Analysis: {}\n\n", result.candidate);

        if self.include_metadata {
            output.push_str(&format!(
                "**Analyzed:** {} | **Processing Time:** {}ms\n\n",
                result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
                result.processing_time_ms
            ));
        }

        output.push_str("## Scores\n\n");
        output.push_str("| Metric | Score |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| ATS Match Score | {}% |\n", result.match_score));
        output.push_str(&format!("| Resume Strength | {}% |\n\n", result.resume_strength));

        output.push_str("## Skills\n\n");
        output.push_str(&format!("**Matched:** {}\n\n", join_or_none(&result.matched_skills)));
        output.push_str(&format!("**Missing:** {}\n\n", join_or_none(&result.missing_skills)));

        output.push_str("## Resume Sections\n\n");
        for (section, present) in result.sections.iter() {
            let mark = if present { "x" } else { " " };
            output.push_str(&format!("- [{}] {}\n", mark, capitalize(section.as_str())));
        }
        output.push('\n');

        if !result.feedback.is_empty() {
            output.push_str("## Feedback\n\n");
            for message in &result.feedback {
                output.push_str(&format!("- {}\n", message));
            }
            output.push('\n');
        }

        output.push_str("## Skill Gap Roadmap\n\n");
        for (tier, skills) in result.skill_gap_roadmap.tiers() {
            output.push_str(&format!("- **{}:** {}\n", capitalize(tier.label()), join_or_none(skills)));
        }
        output.push('\n');

        if !result.rewrite_suggestions.is_empty() {
            output.push_str("## Rewrite Suggestions\n\n");
            for suggestion in &result.rewrite_suggestions {
                output.push_str(&format!(
                    "### {}\n\n*{}*\n\n> {}\n\n",
                    suggestion.skill, suggestion.recommended_section, suggestion.suggested_rewrite
                ));
            }
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*{} resume words | job keywords: {}*\n",
                result.resume_word_count,
                join_or_none(&result.job_keywords)
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, result: &AnalysisResult, include_metadata: bool) -> HtmlTemplate {
        let (match_class, match_label) = score_band(result.match_score);
        let (strength_class, strength_label) = score_band(result.resume_strength);

        HtmlTemplate {
            include_styles: self.include_styles,
            include_metadata,
            candidate: result.candidate.clone(),
            analyzed_at: result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            match_score: result.match_score,
            match_class,
            match_label,
            resume_strength: result.resume_strength,
            strength_class,
            strength_label,
            matched_skills: join_or_none(&result.matched_skills),
            missing_skills: join_or_none(&result.missing_skills),
            sections: result
                .sections
                .iter()
                .map(|(section, present)| HtmlSection {
                    name: capitalize(section.as_str()),
                    present,
                })
                .collect(),
            feedback: result.feedback.clone(),
            tiers: result
                .skill_gap_roadmap
                .tiers()
                .map(|(tier, skills)| HtmlTier {
                    name: tier.label(),
                    label: capitalize(tier.label()),
                    skills: join_or_none(skills),
                })
                .collect(),
            suggestions: result
                .rewrite_suggestions
                .iter()
                .map(|s| HtmlSuggestion {
                    skill: s.skill.clone(),
                    section: s.recommended_section.clone(),
                    source: s.source.label().to_string(),
                    text: s.suggested_rewrite.clone(),
                })
                .collect(),
            resume_word_count: result.resume_word_count,
            processing_time: result.processing_time_ms,
            job_keywords: join_or_none(&result.job_keywords),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, result: &AnalysisResult) -> Result<String> {
        Ok(self.create_template_data(result, true).render()?)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

enum PdfLine {
    Title(String),
    Heading(String),
    Text(String),
    Gap,
}

impl PdfLine {
    fn font_size(&self) -> f32 {
        match self {
            PdfLine::Title(_) => 18.0,
            PdfLine::Heading(_) => 13.0,
            PdfLine::Text(_) | PdfLine::Gap => 10.0,
        }
    }

    /// Vertical space the line takes, in millimetres
    fn advance(&self) -> f32 {
        match self {
            PdfLine::Title(_) => 10.0,
            PdfLine::Heading(_) => 8.0,
            PdfLine::Text(_) => 5.0,
            PdfLine::Gap => 3.0,
        }
    }
}

/// Built-in PDF fonts only cover WinAnsi; keep the text to printable ASCII
fn pdf_text(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' | '\n' | '\r' => Some(' '),
            '•' | '–' | '—' => Some('-'),
            '‘' | '’' => Some('\''),
            '“' | '”' => Some('"'),
            c if c.is_ascii_control() => None,
            c if c.is_ascii() => Some(c),
            _ => Some('?'),
        })
        .collect()
}

/// Greedy word wrap; continuation lines get `indent`
fn wrap_pdf_text(text: &str, indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let prefix_len = if lines.is_empty() { 0 } else { indent.len() };
        if !current.is_empty() && prefix_len + current.len() + 1 + word.len() > PDF_WRAP_COLUMNS {
            lines.push(current);
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| if i == 0 { line } else { format!("{}{}", indent, line) })
        .collect()
}

fn pdf_error(e: printpdf::Error) -> ResumeAnalyzerError {
    ResumeAnalyzerError::OutputFormatting(format!("PDF rendering failed: {}", e))
}

impl PdfFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn push_text(lines: &mut Vec<PdfLine>, text: &str, indent: &str) {
        lines.extend(wrap_pdf_text(&pdf_text(text), indent).into_iter().map(PdfLine::Text));
    }

    fn report_lines(&self, result: &AnalysisResult) -> Vec<PdfLine> {
        let mut lines = vec![PdfLine::Title(pdf_text(&format!("Resume Analysis: {}", result.candidate)))];

        if self.include_metadata {
            Self::push_text(
                &mut lines,
                &format!(
                    "Analyzed: {} | Processing time: {}ms",
                    result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    result.processing_time_ms
                ),
                "",
            );
        }

        lines.push(PdfLine::Gap);
        lines.push(PdfLine::Heading("Scores".to_string()));
        Self::push_text(
            &mut lines,
            &format!("ATS Match Score: {}% ({})", result.match_score, score_band(result.match_score).1),
            "",
        );
        Self::push_text(
            &mut lines,
            &format!("Resume Strength: {}% ({})", result.resume_strength, score_band(result.resume_strength).1),
            "",
        );

        lines.push(PdfLine::Gap);
        lines.push(PdfLine::Heading("Skills".to_string()));
        Self::push_text(&mut lines, &format!("Matched: {}", join_or_none(&result.matched_skills)), "    ");
        Self::push_text(&mut lines, &format!("Missing: {}", join_or_none(&result.missing_skills)), "    ");

        lines.push(PdfLine::Gap);
        lines.push(PdfLine::Heading("Resume Sections".to_string()));
        for (section, present) in result.sections.iter() {
            let mark = if present { "[x]" } else { "[ ]" };
            Self::push_text(&mut lines, &format!("{} {}", mark, capitalize(section.as_str())), "");
        }

        if !result.feedback.is_empty() {
            lines.push(PdfLine::Gap);
            lines.push(PdfLine::Heading("Feedback".to_string()));
            for message in &result.feedback {
                Self::push_text(&mut lines, &format!("- {}", message), "  ");
            }
        }

        lines.push(PdfLine::Gap);
        lines.push(PdfLine::Heading("Skill Gap Roadmap".to_string()));
        for (tier, skills) in result.skill_gap_roadmap.tiers() {
            Self::push_text(
                &mut lines,
                &format!("{}: {}", capitalize(tier.label()), join_or_none(skills)),
                "    ",
            );
        }

        if !result.rewrite_suggestions.is_empty() {
            lines.push(PdfLine::Gap);
            lines.push(PdfLine::Heading("Rewrite Suggestions".to_string()));
            for (i, suggestion) in result.rewrite_suggestions.iter().enumerate() {
                Self::push_text(
                    &mut lines,
                    &format!(
                        "{}. {} ({}, {})",
                        i + 1,
                        suggestion.skill,
                        suggestion.recommended_section,
                        suggestion.source.label()
                    ),
                    "   ",
                );
                Self::push_text(&mut lines, &format!("   {}", suggestion.suggested_rewrite), "   ");
            }
        }

        if self.include_metadata {
            lines.push(PdfLine::Gap);
            Self::push_text(
                &mut lines,
                &format!(
                    "{} resume words | job keywords: {}",
                    result.resume_word_count,
                    join_or_none(&result.job_keywords)
                ),
                "",
            );
            Self::push_text(
                &mut lines,
                &format!("Generated by resume-analyzer v{}", env!("CARGO_PKG_VERSION")),
                "",
            );
        }

        lines
    }

    /// Render the report as PDF bytes, adding pages as the text runs over
    pub fn render(&self, result: &AnalysisResult) -> Result<Vec<u8>> {
        let title = pdf_text(&format!("Resume Analysis: {}", result.candidate));
        let (doc, page, layer) = PdfDocument::new(
            title.as_str(),
            Mm(PDF_PAGE_WIDTH_MM),
            Mm(PDF_PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

        let mut current_layer = doc.get_page(page).get_layer(layer);
        let mut page_count = 1;
        let mut y = PDF_PAGE_HEIGHT_MM - PDF_MARGIN_MM;

        for line in self.report_lines(result) {
            if y - line.advance() < PDF_MARGIN_MM {
                page_count += 1;
                let (page, layer) = doc.add_page(
                    Mm(PDF_PAGE_WIDTH_MM),
                    Mm(PDF_PAGE_HEIGHT_MM),
                    format!("Layer {}", page_count),
                );
                current_layer = doc.get_page(page).get_layer(layer);
                y = PDF_PAGE_HEIGHT_MM - PDF_MARGIN_MM;
            }
            y -= line.advance();

            match &line {
                PdfLine::Title(text) | PdfLine::Heading(text) => {
                    current_layer.use_text(text.as_str(), line.font_size(), Mm(PDF_MARGIN_MM), Mm(y), &bold);
                }
                PdfLine::Text(text) => {
                    current_layer.use_text(text.as_str(), line.font_size(), Mm(PDF_MARGIN_MM), Mm(y), &regular);
                }
                PdfLine::Gap => {}
            }
        }

        doc.save_to_bytes().map_err(pdf_error)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
            pdf_formatter: PdfFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, result: &AnalysisResult, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(result),
            OutputFormat::Json => self.json_formatter.format_report(result),
            OutputFormat::Markdown => self.markdown_formatter.format_report(result),
            OutputFormat::Html => self.html_formatter.format_report(result),
            OutputFormat::Pdf => Err(ResumeAnalyzerError::OutputFormatting(
                "PDF reports are binary; render them with generate_bytes".to_string(),
            )),
        }
    }

    /// Report as file contents: PDF bytes, or the UTF-8 text of the other formats
    pub fn generate_bytes(&self, result: &AnalysisResult, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Pdf => self.pdf_formatter.render(result),
            other => Ok(self.generate_report(result, other)?.into_bytes()),
        }
    }

    pub fn generate_history(&self, records: &[HistoryRecord], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => Ok(self.console_formatter.format_history(records)),
            OutputFormat::Json => self.json_formatter.format_history(records),
            other => Err(ResumeAnalyzerError::OutputFormatting(format!(
                "history cannot be rendered as {:?}",
                other
            ))),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_bytes(content: &[u8], file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// File name for a saved report, e.g. `jane_doe_analysis.md`
pub fn suggest_filename(format: OutputFormat, candidate: &str, timestamp: bool) -> String {
    let base_name: String = candidate
        .trim()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let base_name = if base_name.is_empty() { "resume".to_string() } else { base_name };

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
        OutputFormat::Pdf => "pdf",
    };

    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::rewriter::{Suggestion, SuggestionSource};
    use crate::processing::sections::SectionDetector;
    use crate::processing::skill_gap::SkillGapRoadmap;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            candidate: "Jane <Doe>".to_string(),
            analyzed_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            match_score: 40,
            resume_strength: 55,
            matched_skills: strings(&["python", "sql"]),
            missing_skills: strings(&["aws", "docker", "java"]),
            core_missing: strings(&["java"]),
            sections: SectionDetector::default().detect_sections("Summary\nExperience\nSkills"),
            feedback: strings(&["Missing resume sections: education."]),
            skill_gap_roadmap: SkillGapRoadmap {
                critical: strings(&["java"]),
                important: strings(&["aws", "docker"]),
                optional: vec![],
            },
            rewrite_suggestions: vec![Suggestion {
                skill: "aws".to_string(),
                suggested_rewrite: "Deployed workloads on AWS.".to_string(),
                recommended_section: "Experience / Projects".to_string(),
                source: SuggestionSource::Template,
            }],
            resume_skills: strings(&["python", "sql"]),
            job_skills: strings(&["aws", "docker", "java", "python", "sql"]),
            job_keywords: strings(&["cloud", "services"]),
            resume_word_count: 321,
            processing_time_ms: 7,
        }
    }

    fn history() -> Vec<HistoryRecord> {
        vec![HistoryRecord {
            id: 3,
            candidate_name: "Jane".to_string(),
            job_description: "Backend engineer\nwith Python and SQL".to_string(),
            score: 80,
            matched_skills: strings(&["python", "sql"]),
            missing_skills: strings(&["aws"]),
            resume_words: 410,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        }]
    }

    #[test]
    fn test_console_report_without_colors() {
        let output = ConsoleFormatter::new(false, false).format_report(&sample_result()).unwrap();

        assert!(output.contains("RESUME ANALYSIS: Jane <Doe>"));
        assert!(output.contains("ATS Match Score: 40% [WEAK]"));
        assert!(output.contains("Resume Strength: 55% [WEAK]"));
        assert!(output.contains("Matched (2): python, sql"));
        assert!(output.contains("[ ] Education"));
        assert!(output.contains("[x] Skills"));
        assert!(output.contains("Optional:  none"));
        assert!(output.contains("1. aws (Experience / Projects, template)"));
        assert!(!output.contains("Job keywords"));
    }

    #[test]
    fn test_console_detailed_lists_keywords() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample_result()).unwrap();
        assert!(output.contains("Job keywords: cloud, services"));
        assert!(output.contains("Resume words: 321"));
    }

    #[test]
    fn test_console_labels_generated_suggestions() {
        let mut result = sample_result();
        result.rewrite_suggestions[0].source = SuggestionSource::Generated;

        let output = ConsoleFormatter::new(false, false).format_report(&result).unwrap();
        assert!(output.contains("1. aws (Experience / Projects, generated)"));
        assert!(!output.contains("template)"));
    }

    #[test]
    fn test_pdf_report_bytes() {
        let bytes = PdfFormatter::new(true).render(&sample_result()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let generator = ReportGenerator::with_options(false, false, true, true, true);
        assert!(generator.generate_report(&sample_result(), OutputFormat::Pdf).is_err());
        assert!(generator
            .generate_bytes(&sample_result(), OutputFormat::Pdf)
            .unwrap()
            .starts_with(b"%PDF"));
        assert!(generator
            .generate_bytes(&sample_result(), OutputFormat::Markdown)
            .unwrap()
            .starts_with(b"# Resume Analysis"));
    }

    #[test]
    fn test_pdf_lines_are_ascii_and_paginate() {
        let mut result = sample_result();
        result.candidate = "Zoë — Müller".to_string();
        result.feedback = (0..120).map(|i| format!("Feedback line {} • keep it short", i)).collect();

        let formatter = PdfFormatter::new(false);
        let lines = formatter.report_lines(&result);
        for line in &lines {
            if let PdfLine::Title(text) | PdfLine::Heading(text) | PdfLine::Text(text) = line {
                assert!(text.is_ascii());
                assert!(text.len() <= PDF_WRAP_COLUMNS);
            }
        }
        assert!(matches!(&lines[0], PdfLine::Title(t) if t == "Resume Analysis: Zo? - M?ller"));

        let bytes = formatter.render(&result).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_wrap_pdf_text() {
        let long = "word ".repeat(40);
        let lines = wrap_pdf_text(long.trim(), "  ");
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= PDF_WRAP_COLUMNS));
        assert!(lines[1].starts_with("  word"));
        assert_eq!(wrap_pdf_text("", ""), vec![String::new()]);
    }

    #[test]
    fn test_json_report_round_trips_fields() {
        let output = JsonFormatter::new(false).format_report(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["match_score"], 40);
        assert_eq!(value["sections"]["education"], false);
        assert_eq!(value["skill_gap_roadmap"]["critical"][0], "java");
        assert_eq!(value["rewrite_suggestions"][0]["source"], "template");
    }

    #[test]
    fn test_markdown_report() {
        let output = MarkdownFormatter::new(false).format_report(&sample_result()).unwrap();
        assert!(output.starts_with("# Resume Analysis: Jane <Doe>"));
        assert!(output.contains("| ATS Match Score | 40% |"));
        assert!(output.contains("- [ ] Education"));
        assert!(output.contains("- **Critical:** java"));
        assert!(!output.contains("**Analyzed:**"));
    }

    #[test]
    fn test_html_report_escapes_content() {
        let output = HtmlFormatter::new(false).format_report(&sample_result()).unwrap();
        assert!(output.contains("Jane &#60;Doe&#62;") || output.contains("Jane &lt;Doe&gt;"));
        assert!(!output.contains("Jane <Doe>"));
        assert!(output.contains("Skill Gap Roadmap"));
        assert!(!output.contains("<style>"));
    }

    #[test]
    fn test_history_rendering() {
        let generator = ReportGenerator::with_options(false, false, false, true, true);
        let records = history();

        let console = generator.generate_history(&records, OutputFormat::Console).unwrap();
        assert!(console.contains("#3"));
        assert!(console.contains("80% [GOOD]"));
        assert!(console.contains("Backend engineer with Python and SQL"));

        let json = generator.generate_history(&records, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["resume_words"], 410);

        assert!(generator.generate_history(&records, OutputFormat::Html).is_err());
        assert!(generator
            .generate_history(&[], OutputFormat::Console)
            .unwrap()
            .contains("No analyses recorded yet."));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Markdown, "Jane Doe", false), "jane_doe_analysis.md");
        assert_eq!(suggest_filename(OutputFormat::Json, "  ", false), "resume_analysis.json");
        assert!(suggest_filename(OutputFormat::Html, "A", true).ends_with(".html"));
        assert_eq!(suggest_filename(OutputFormat::Pdf, "Jane Doe", false), "jane_doe_analysis.pdf");
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("out.md");
        save_report_bytes(b"# Report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report");
    }
}
