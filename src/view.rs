use serde::Serialize;
use crate::scraper::JobRecord;

/// Separator LinkedIn uses between company name and location in listing text.
pub const COMPANY_SEPARATOR: &str = " · ";

/// Render model for one job panel. Indices are 1-based display counters.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub index: usize,
    pub title: String,
    pub link: String,
    pub company_name: String,
    pub company_location: Option<String>,
    pub company_link: String,
    pub date: String,
    pub description: String,
    pub first_insight: Option<String>,
    pub apply_link: Option<String>,
}

impl JobView {
    pub fn from_record(index: usize, record: &JobRecord) -> Self {
        let (company_name, company_location) = split_company(&record.company);
        JobView {
            index,
            title: record.title.clone(),
            link: record.link.clone(),
            company_name,
            company_location,
            company_link: record.company_link.clone(),
            date: record.date.clone(),
            description: record.description.clone(),
            first_insight: record.insights.first().cloned(),
            apply_link: record.apply_link.clone(),
        }
    }
}

pub fn views(records: &[JobRecord]) -> Vec<JobView> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| JobView::from_record(i + 1, record))
        .collect()
}

/// Splits "Company · Location" into name and location. Anything that is not
/// exactly two parts falls back to the whole string with no location.
pub fn split_company(company: &str) -> (String, Option<String>) {
    let parts: Vec<&str> = company.split(COMPANY_SEPARATOR).collect();
    if parts.len() == 2 {
        (parts[0].to_string(), Some(parts[1].to_string()))
    } else {
        (company.to_string(), None)
    }
}

pub fn showing_line(count: usize) -> String {
    format!("Currently showing {} jobs", count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: &str) -> JobRecord {
        JobRecord {
            title: "Data Scientist".to_string(),
            company: company.to_string(),
            company_link: "https://www.linkedin.com/company/acme-corp".to_string(),
            date: "2024-03-01".to_string(),
            link: "https://se.linkedin.com/jobs/view/1".to_string(),
            insights: vec!["Seniority level: Entry level".to_string()],
            description: "desc".to_string(),
            apply_link: None,
        }
    }

    #[test]
    fn splits_company_and_location() {
        assert_eq!(
            split_company("Acme Corp · Stockholm"),
            ("Acme Corp".to_string(), Some("Stockholm".to_string()))
        );
    }

    #[test]
    fn company_without_separator_falls_back_whole() {
        assert_eq!(split_company("Acme Corp"), ("Acme Corp".to_string(), None));
    }

    #[test]
    fn company_with_extra_separators_falls_back_whole() {
        let input = "Acme Corp · Stockholm · Hybrid";
        assert_eq!(split_company(input), (input.to_string(), None));
    }

    #[test]
    fn views_are_indexed_from_one() {
        let records = vec![record("Acme Corp · Stockholm"), record("Globex")];
        let views = views(&records);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].index, 1);
        assert_eq!(views[1].index, 2);
        assert_eq!(views[0].company_name, "Acme Corp");
        assert_eq!(views[0].company_location.as_deref(), Some("Stockholm"));
        assert_eq!(views[1].company_name, "Globex");
        assert!(views[1].company_location.is_none());
        assert_eq!(
            views[0].first_insight.as_deref(),
            Some("Seniority level: Entry level")
        );
    }

    #[test]
    fn showing_line_counts() {
        assert_eq!(showing_line(0), "Currently showing 0 jobs");
        assert_eq!(showing_line(3), "Currently showing 3 jobs");
    }
}
