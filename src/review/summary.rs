//! Executive summary rendering.

use std::fmt;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::model::Analysis;

/// Highest possible total score: six dimensions scored 0-5.
pub const MAX_TOTAL_SCORE: u32 = 30;

const MAX_LEADERSHIP_BULLETS: usize = 5;
const MAX_KEY_GAPS: usize = 3;

/// Coarse quality band for a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// Up to 10.
    Low,
    /// Above 10, up to 20.
    Medium,
    /// Above 20.
    High,
}

impl ScoreBand {
    /// Band for a total score out of [`MAX_TOTAL_SCORE`].
    #[must_use]
    pub fn from_total(total: f64) -> Self {
        if total <= 10.0 {
            Self::Low
        } else if total <= 20.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Renders the executive summary of `analysis` as Markdown.
#[must_use]
pub fn render_summary(analysis: &Analysis, generated_at: DateTime<Utc>) -> String {
    let es = &analysis.executive_summary;
    let mut out = String::new();

    let _ = writeln!(out, "# RCA Reviewer -- Executive Summary");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "_Auto-generated. Updated on {}._",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    section(&mut out, "Section 1: Overall Assessment");
    let _ = writeln!(
        out,
        "**RCA Quality Score: {} / {MAX_TOTAL_SCORE}** ({})",
        analysis.total_score,
        ScoreBand::from_total(analysis.total_score)
    );
    paragraph(&mut out, &es.overall_interpretation);

    section(&mut out, "Section 2: Leadership Summary");
    for bullet in es.leadership_bullets.iter().take(MAX_LEADERSHIP_BULLETS) {
        let _ = writeln!(out, "- {bullet}");
    }

    section(&mut out, "Section 3: Key Gaps Identified");
    for (i, gap) in es.key_gaps.iter().take(MAX_KEY_GAPS).enumerate() {
        let _ = writeln!(out, "{}. {gap}", i + 1);
    }

    section(&mut out, "Section 4: Recurrence Risk");
    let risk = if es.recurrence_risk.trim().is_empty() { "N/A" } else { es.recurrence_risk.trim() };
    let _ = writeln!(out, "**{risk}**");
    paragraph(&mut out, &es.recurrence_rationale);

    section(&mut out, "Section 5: Action Items Critique");
    paragraph(&mut out, &es.action_critique);

    section(&mut out, "Section 6: What to Improve Next");
    for improvement in &es.improvements {
        let _ = writeln!(out, "- {improvement}");
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "## {title}");
    let _ = writeln!(out);
}

fn paragraph(out: &mut String, text: &str) {
    if !text.trim().is_empty() {
        let _ = writeln!(out, "{}", text.trim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExecutiveSummary;
    use chrono::TimeZone;

    fn analysis() -> Analysis {
        Analysis {
            total_score: 14.0,
            executive_summary: ExecutiveSummary {
                overall_interpretation: "Adequate but shallow.".into(),
                leadership_bullets: (1..=7).map(|i| format!("bullet {i}")).collect(),
                key_gaps: vec!["gap a".into(), "gap b".into(), "gap c".into(), "gap d".into()],
                recurrence_risk: "High".into(),
                recurrence_rationale: "No load testing gate.".into(),
                action_critique: "Actions are reactive.".into(),
                improvements: vec!["one".into(), "two".into(), "three".into(), "four".into()],
            },
            ..Analysis::default()
        }
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_total(0.0), ScoreBand::Low);
        assert_eq!(ScoreBand::from_total(10.0), ScoreBand::Low);
        assert_eq!(ScoreBand::from_total(10.5), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_total(20.0), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_total(20.5), ScoreBand::High);
        assert_eq!(ScoreBand::from_total(30.0), ScoreBand::High);
    }

    #[test]
    fn fractional_total_is_rendered_as_sent() {
        let analysis = Analysis {
            total_score: 17.5,
            ..Analysis::default()
        };
        let out = render_summary(&analysis, Utc::now());
        assert!(out.contains("**RCA Quality Score: 17.5 / 30** (medium)"));
    }

    #[test]
    fn summary_caps_bullets_and_gaps() {
        let at = Utc.with_ymd_and_hms(2026, 1, 16, 9, 30, 0).unwrap();
        let out = render_summary(&analysis(), at);

        assert!(out.contains("_Auto-generated. Updated on 2026-01-16 09:30 UTC._"));
        assert!(out.contains("**RCA Quality Score: 14 / 30** (medium)"));
        assert!(out.contains("- bullet 5\n"));
        assert!(!out.contains("bullet 6"));
        assert!(out.contains("3. gap c\n"));
        assert!(!out.contains("gap d"));
        assert!(out.contains("- four\n"));
        assert!(out.contains("**High**\nNo load testing gate."));
    }

    #[test]
    fn missing_risk_renders_not_available() {
        let out = render_summary(&Analysis::default(), Utc::now());
        assert!(out.contains("## Section 4: Recurrence Risk\n\n**N/A**"));
        assert!(out.contains("**RCA Quality Score: 0 / 30** (low)"));
    }
}
