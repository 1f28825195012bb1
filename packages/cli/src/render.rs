//! Plain-text reports for each view.

use std::fmt;

use cps_dashboard_analytics_models::RankedSchool;
use cps_dashboard_detail::{NO_VALUE, SchoolDetail, score_display};
use cps_dashboard_school_models::SchoolRecord;
use cps_dashboard_view::{DashboardView, ListView};

const NAME_WIDTH: usize = 44;

/// Landing dashboard.
pub struct SummaryReport<'a>(pub &'a DashboardView);

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.0.summary;

        writeln!(f, "Schools analyzed:     {}", summary.total_count)?;
        writeln!(f, "Elementary (ES):      {}", summary.elementary_count)?;
        writeln!(f, "High school (HS):     {}", summary.high_school_count)?;
        writeln!(f, "Average safety:       {:.1}", summary.avg_safety)?;
        writeln!(f, "Average instruction:  {:.1}", summary.avg_instruction)?;
        writeln!(f, "Average teachers:     {:.1}", summary.avg_teachers)?;

        let preview = self.0.preview();
        writeln!(f)?;
        writeln!(f, "Top {} by safety", preview.len())?;
        write_ranking(f, preview)?;

        writeln!(f)?;
        writeln!(f, "Top {} by instruction", summary.top_instruction.len())?;
        write_ranking(f, &summary.top_instruction)
    }
}

fn write_ranking(f: &mut fmt::Formatter<'_>, ranked: &[RankedSchool]) -> fmt::Result {
    if ranked.is_empty() {
        return writeln!(f, "  (no scored schools)");
    }
    for entry in ranked {
        writeln!(
            f,
            "  {:>2}. {:<NAME_WIDTH$} {:>3}  {}",
            entry.rank,
            truncate(&entry.name, NAME_WIDTH),
            entry.score,
            "⭐".repeat(usize::from(entry.stars)),
        )?;
    }
    Ok(())
}

/// Filtered school list.
pub struct ListReport<'a>(pub &'a ListView);

impl fmt::Display for ListReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = self.0;
        let visible = list.visible();
        let criteria = list.criteria();

        writeln!(
            f,
            "Showing {} of {} schools (type: {}, rating: {}, search: {:?})",
            visible.len(),
            list.records().len(),
            criteria.type_filter,
            criteria.rating_filter,
            criteria.search_text,
        )?;

        if visible.is_empty() {
            return writeln!(f, "No schools match the current filters.");
        }

        writeln!(
            f,
            "{:<8} {:<NAME_WIDTH$} {:<5} {:<12} {:>7}",
            "ID", "NAME", "TYPE", "RATING", "SAFETY"
        )?;
        for record in visible {
            write_row(f, record)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, record: &SchoolRecord) -> fmt::Result {
    let school_type = record
        .school_type
        .map_or_else(|| NO_VALUE.to_string(), |t| t.to_string());
    let rating = record
        .safety_rating
        .map_or_else(|| NO_VALUE.to_string(), |r| r.to_string());

    writeln!(
        f,
        "{:<8} {:<NAME_WIDTH$} {:<5} {:<12} {:>7}",
        record.id,
        truncate(&record.display_name(), NAME_WIDTH),
        school_type,
        rating,
        score_display(&record.safety_score),
    )
}

/// Single school.
pub struct DetailReport<'a>(pub &'a SchoolDetail);

impl fmt::Display for DetailReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.0;
        let record = &detail.record;

        writeln!(f, "{}", detail.name)?;
        writeln!(f, "  ID:          {}", record.id)?;
        writeln!(f, "  Type:        {}", detail.type_label)?;
        writeln!(f, "  Address:     {}", detail.address_line)?;
        writeln!(f, "  ZIP:         {}", detail.zip_code)?;
        writeln!(f, "  Community:   {}", detail.community)?;
        writeln!(f, "  Network:     {}", detail.network)?;
        writeln!(f, "  Phone:       {}", detail.phone)?;
        match record.coordinates {
            Some(c) => writeln!(f, "  Location:    {:.5}, {:.5}", c.latitude, c.longitude)?,
            None => writeln!(f, "  Location:    {NO_VALUE}")?,
        }
        writeln!(f, "  Safety:      {}", detail.safety_stars)?;
        writeln!(
            f,
            "  Report:      {}",
            record.report_url.as_deref().unwrap_or(NO_VALUE)
        )?;

        writeln!(f)?;
        writeln!(f, "  Scores")?;
        for metric in &detail.metrics {
            writeln!(
                f,
                "    {:<12} {:>7}  {}",
                metric.label, metric.display, metric.tier
            )?;
        }
        Ok(())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
