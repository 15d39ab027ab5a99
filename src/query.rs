use serde::{Deserialize, Serialize};
use url::Url;

/// Public (guest) job-search endpoint. Returns an HTML fragment of listing
/// cards, paged 25 at a time via the `start` parameter.
pub const SEARCH_ENDPOINT: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";

pub const PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RelevanceFilter {
    #[default]
    #[serde(rename = "Most Relevant")]
    Relevant,
    #[serde(rename = "Most Recent")]
    Recent,
}

impl RelevanceFilter {
    pub fn as_param(&self) -> &'static str {
        match self {
            RelevanceFilter::Relevant => "R",
            RelevanceFilter::Recent => "DD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFilter {
    #[default]
    #[serde(rename = "Anytime")]
    Any,
    #[serde(rename = "Past 24 hours")]
    Day,
    #[serde(rename = "Past Week")]
    Week,
    #[serde(rename = "Past Month")]
    Month,
}

impl TimeFilter {
    // Values are seconds since posting (f_TPR=r<seconds>). Anytime sends no parameter.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            TimeFilter::Any => None,
            TimeFilter::Day => Some("r86400"),
            TimeFilter::Week => Some("r604800"),
            TimeFilter::Month => Some("r2592000"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeFilter {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Internship")]
    Internship,
    #[serde(rename = "Part-Time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
}

impl TypeFilter {
    pub fn as_param(&self) -> &'static str {
        match self {
            TypeFilter::FullTime => "F",
            TypeFilter::Internship => "I",
            TypeFilter::PartTime => "P",
            TypeFilter::Contract => "C",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkModeFilter {
    #[serde(rename = "On-Site")]
    OnSite,
    #[serde(rename = "Remote")]
    Remote,
    #[serde(rename = "Hybrid")]
    Hybrid,
}

impl WorkModeFilter {
    pub fn as_param(&self) -> &'static str {
        match self {
            WorkModeFilter::OnSite => "1",
            WorkModeFilter::Remote => "2",
            WorkModeFilter::Hybrid => "3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceFilter {
    #[serde(rename = "Internship")]
    Internship,
    #[serde(rename = "Entry-Level")]
    EntryLevel,
    #[serde(rename = "Mid-Senior")]
    MidSenior,
}

impl ExperienceFilter {
    pub fn as_param(&self) -> &'static str {
        match self {
            ExperienceFilter::Internship => "1",
            ExperienceFilter::EntryLevel => "2",
            ExperienceFilter::MidSenior => "4",
        }
    }
}

// Base-salary buckets. The form does not collect these; the boundary still
// accepts them for callers that page the endpoint directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryFilter {
    Salary40K,
    Salary60K,
    Salary80K,
    Salary100K,
    Salary120K,
    Salary140K,
    Salary160K,
    Salary180K,
    Salary200K,
}

impl SalaryFilter {
    pub fn as_param(&self) -> &'static str {
        match self {
            SalaryFilter::Salary40K => "1",
            SalaryFilter::Salary60K => "2",
            SalaryFilter::Salary80K => "3",
            SalaryFilter::Salary100K => "4",
            SalaryFilter::Salary120K => "5",
            SalaryFilter::Salary140K => "6",
            SalaryFilter::Salary160K => "7",
            SalaryFilter::Salary180K => "8",
            SalaryFilter::Salary200K => "9",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    pub relevance: RelevanceFilter,
    pub time: TimeFilter,
    pub types: Vec<TypeFilter>,
    pub experience: Vec<ExperienceFilter>,
    pub work_modes: Vec<WorkModeFilter>,
    pub salary: Option<SalaryFilter>,
}

#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub locations: Vec<String>,
    pub limit: usize,
    pub page_offset: usize,
    // Extracting the apply link requires one extra request per job, so runs are slower.
    pub apply_link: bool,
    pub skip_promoted_jobs: bool,
    pub filters: QueryFilters,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            locations: Vec::new(),
            limit: PAGE_SIZE,
            page_offset: 0,
            apply_link: false,
            skip_promoted_jobs: false,
            filters: QueryFilters::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    pub query: String,
    pub options: QueryOptions,
}

impl Query {
    pub fn search_url(&self, location: &str, start: usize) -> String {
        let mut url = Url::parse(SEARCH_ENDPOINT).unwrap();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("keywords", &self.query);
            if !location.is_empty() {
                pairs.append_pair("location", location);
            }
            pairs.append_pair("sortBy", self.options.filters.relevance.as_param());
            if let Some(time) = self.options.filters.time.as_param() {
                pairs.append_pair("f_TPR", time);
            }
            if !self.options.filters.types.is_empty() {
                pairs.append_pair("f_JT", &join_params(&self.options.filters.types, TypeFilter::as_param));
            }
            if !self.options.filters.experience.is_empty() {
                pairs.append_pair(
                    "f_E",
                    &join_params(&self.options.filters.experience, ExperienceFilter::as_param),
                );
            }
            if !self.options.filters.work_modes.is_empty() {
                pairs.append_pair(
                    "f_WT",
                    &join_params(&self.options.filters.work_modes, WorkModeFilter::as_param),
                );
            }
            if let Some(salary) = self.options.filters.salary {
                pairs.append_pair("f_SB2", salary.as_param());
            }
            pairs.append_pair("start", &start.to_string());
        }
        url.into()
    }
}

fn join_params<T: Copy>(values: &[T], as_param: fn(&T) -> &'static str) -> String {
    values.iter().map(as_param).collect::<Vec<_>>().join(",")
}

/// Selections collected from the filter form. One request's worth of input;
/// validated only for non-empty title and location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub job_title: String,
    pub location: String,
    pub relevance: RelevanceFilter,
    pub time: TimeFilter,
    pub job_types: Vec<TypeFilter>,
    pub work_modes: Vec<WorkModeFilter>,
    pub experience: Vec<ExperienceFilter>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            job_title: "Data Scientist".to_string(),
            location: "Sweden".to_string(),
            relevance: RelevanceFilter::Relevant,
            time: TimeFilter::Week,
            job_types: vec![TypeFilter::FullTime, TypeFilter::Internship],
            work_modes: Vec::new(),
            experience: Vec::new(),
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.job_title.trim().is_empty() {
            return Err("Please enter a job title");
        }
        if self.location.trim().is_empty() {
            return Err("Please enter a location");
        }
        Ok(())
    }

    pub fn to_query(&self, limit: usize) -> Query {
        Query {
            query: self.job_title.clone(),
            options: QueryOptions {
                locations: vec![self.location.clone()],
                limit,
                page_offset: 0,
                apply_link: true,
                skip_promoted_jobs: false,
                filters: QueryFilters {
                    relevance: self.relevance,
                    time: self.time,
                    types: self.job_types.clone(),
                    experience: self.experience.clone(),
                    work_modes: self.work_modes.clone(),
                    salary: None,
                },
            },
        }
    }
}
