//! Text rendering for terminal output.

use std::fmt::Write as _;

use chrono::DateTime;
use profeshare_skills::{CategorizedSkills, SkillName, SkillsOverview};
use profeshare_store::{Account, StudentProfile};
use serde_json::{Value, json};

/// Unix timestamp as `YYYY-MM-DD HH:MM UTC`.
pub fn timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn skill_list(skills: &[SkillName]) -> String {
    if skills.is_empty() {
        return "  (no skills)\n".to_owned();
    }
    let mut out = String::new();
    for skill in skills {
        let _ = writeln!(out, "  - {skill}");
    }
    out
}

/// One block per non-empty category, in taxonomy order.
pub fn categories(grouped: &CategorizedSkills) -> String {
    if grouped.is_empty() {
        return "  (no skills)\n".to_owned();
    }
    let mut out = String::new();
    for (category, skills) in grouped.iter() {
        let _ = writeln!(out, "  {category} ({})", skills.len());
        for skill in skills {
            let _ = writeln!(out, "    - {skill}");
        }
    }
    out
}

pub fn account(account: &Account) -> String {
    format!(
        "  Email:      {}\n  Student id: {}\n  Since:      {}\n",
        account.email,
        account.student_id,
        timestamp(account.created_at)
    )
}

/// Full profile view: identity, top skills, categories, projects.
pub fn profile(profile: &StudentProfile) -> String {
    let overview = profile.skills_overview();
    let mut out = String::new();

    let _ = writeln!(out, "  {}", profile.full_name());
    let _ = writeln!(out, "  Student id: {}", profile.student_id);
    let _ = writeln!(out, "  Email:      {}", profile.email);
    if let Some(image) = &profile.profile_image {
        let _ = writeln!(out, "  Image:      {image}");
    }
    let _ = writeln!(out, "  Updated:    {}", timestamp(profile.updated_at));
    out.push('\n');

    let _ = writeln!(
        out,
        "  Skills: {} in {} categories",
        overview.total, overview.category_count
    );
    if !overview.top.is_empty() {
        let top: Vec<&str> = overview.top.iter().map(SkillName::as_str).collect();
        let _ = writeln!(out, "  Top:    {}", top.join(", "));
    }
    out.push('\n');
    out.push_str(&categories(&overview.categories));

    let projects = profile.project_list();
    if !projects.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "  Projects ({})", projects.len());
        for project in projects {
            let _ = writeln!(out, "    - {}", project_title(project));
        }
    }

    for (label, value) in [
        ("Experience", &profile.experience),
        ("Certifications & licenses", &profile.certifications_and_licenses),
        ("Job preferences", &profile.job_preferences),
    ] {
        if let Some(value) = value {
            out.push('\n');
            let _ = writeln!(out, "  {label}: {}", compact(value));
        }
    }

    out
}

/// One line per profile for `profile list`.
pub fn profile_row(profile: &StudentProfile) -> String {
    format!(
        "  {:<12} {:<28} {:>3} skills  {}",
        profile.student_id,
        profile.full_name(),
        profile.skills().len(),
        timestamp(profile.created_at)
    )
}

/// JSON document for `profile show --json`.
pub fn profile_json(profile: &StudentProfile) -> Value {
    let overview: SkillsOverview = profile.skills_overview();
    json!({
        "profile": profile,
        "skills": profile.skills(),
        "overview": overview,
    })
}

fn project_title(project: &Value) -> String {
    match project {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("title"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| compact(project)),
        other => compact(other),
    }
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use profeshare_skills::{RawSkillsValue, categorize, parse};

    use super::*;

    fn sample() -> StudentProfile {
        StudentProfile {
            id: "p1".into(),
            student_id: "S1001".into(),
            first_name: "Ishaan".into(),
            last_name: "Malik".into(),
            email: "ishaan@example.com".into(),
            skills: RawSkillsValue::from(json!(["JavaScript", "React", "PostgreSQL", "AWS", "Nmap", "Figma"])),
            projects: Some(json!([{"name": "Port scanner"}, "Homelab"])),
            experience: None,
            certifications_and_licenses: Some(json!(["CompTIA Security+"])),
            job_preferences: Some(json!("Remote")),
            profile_image: None,
            created_at: 0,
            updated_at: 86_400,
        }
    }

    #[test]
    fn timestamp_formats_utc() {
        assert_eq!(timestamp(0), "1970-01-01 00:00 UTC");
        assert_eq!(timestamp(86_400), "1970-01-02 00:00 UTC");
    }

    #[test]
    fn empty_lists_say_so() {
        assert_eq!(skill_list(&[]), "  (no skills)\n");
        assert_eq!(categories(&CategorizedSkills::default()), "  (no skills)\n");
    }

    #[test]
    fn categories_follow_taxonomy_order() {
        let skills = parse(&RawSkillsValue::from(r#"["Nmap","JavaScript","Quantum Basket Weaving"]"#));
        let text = categories(&categorize(&skills));
        let pl = text.find("Programming Languages (1)").unwrap();
        let cyber = text.find("Cybersecurity (1)").unwrap();
        let other = text.find("Other (1)").unwrap();
        assert!(pl < cyber && cyber < other);
        assert!(text.contains("    - Quantum Basket Weaving"));
    }

    #[test]
    fn profile_view_has_overview_and_projects() {
        let text = profile(&sample());
        assert!(text.starts_with("  Ishaan Malik\n"));
        assert!(text.contains("Skills: 6 in 6 categories"));
        assert!(text.contains("Top:    JavaScript, React, PostgreSQL, AWS, Nmap\n"));
        assert!(text.contains("Tools & Software (1)"));
        assert!(text.contains("    - Port scanner"));
        assert!(text.contains("    - Homelab"));
        assert!(text.contains("Job preferences: Remote"));
        assert!(!text.contains("Experience"));
    }

    #[test]
    fn profile_json_carries_raw_and_normalized_skills() {
        let doc = profile_json(&sample());
        assert!(doc["profile"]["skills"].is_array());
        assert_eq!(doc["skills"][5], "Figma");
        assert_eq!(doc["overview"]["total"], 6);
        let keys: Vec<&String> = doc["overview"]["categories"].as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "Programming Languages");
        assert_eq!(keys[5], "Tools & Software");
    }

    #[test]
    fn row_is_single_line() {
        let row = profile_row(&sample());
        assert!(!row.contains('\n'));
        assert!(row.contains("S1001"));
        assert!(row.contains("6 skills"));
    }
}
