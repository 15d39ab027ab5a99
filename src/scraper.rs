use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT, ACCEPT_LANGUAGE};
use scraper::{Html, Selector};
use std::sync::Mutex;
use std::time::Duration;
use log::{info, warn, debug};
use regex::Regex;
use crate::delay;
use crate::query::{Query, PAGE_SIZE};
use crate::view::COMPANY_SEPARATOR;
use crate::Result;

const DETAIL_ENDPOINT: &str = "https://www.linkedin.com/jobs-guest/jobs/api/jobPosting";

pub struct ScraperConfig {
    pub page_load_timeout: Duration,
    pub slow_mo: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            page_load_timeout: Duration::from_secs(40),
            slow_mo: Duration::from_millis(500),
        }
    }
}

/// One scraped job posting, emitted through the `run` callback in discovery
/// order. `link` doubles as the record's unique key.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub company_link: String,
    pub date: String,
    pub link: String,
    pub insights: Vec<String>,
    pub description: String,
    pub apply_link: Option<String>,
}

pub trait JobFetcher: Send + Sync {
    fn fetch(&self, query: &Query) -> Result<Vec<JobRecord>>;
}

pub struct LinkedinScraper {
    client: Client,
    slow_mo: Duration,
    // One run at a time; the guest endpoint is paged politely, not in parallel.
    run_lock: Mutex<()>,
}

// Fields parsed off a single listing card. Promoted placements carry no
// posting date.
struct JobCard {
    title: String,
    link: String,
    company: String,
    company_link: String,
    date: Option<String>,
    job_id: Option<String>,
}

struct JobDetail {
    description: String,
    insights: Vec<String>,
    apply_link: Option<String>,
}

impl LinkedinScraper {
    pub fn new(config: ScraperConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(config.page_load_timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        LinkedinScraper {
            client,
            slow_mo: config.slow_mo,
            run_lock: Mutex::new(()),
        }
    }

    fn get_random_user_agent(&self) -> &str {
        let uas = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
        ];
        use rand::Rng;
        let mut rng = rand::thread_rng();
        uas[rng.gen_range(0..uas.len())]
    }

    /// Runs the given queries, invoking `on_data` once per discovered job.
    /// The callback is scoped to this invocation; nothing is kept across calls.
    pub fn run<F>(&self, queries: &[Query], mut on_data: F) -> Result<()>
    where
        F: FnMut(JobRecord),
    {
        let _guard = self.run_lock.lock().unwrap();

        for query in queries {
            self.run_query(query, &mut on_data)?;
        }
        Ok(())
    }

    fn run_query(&self, query: &Query, on_data: &mut dyn FnMut(JobRecord)) -> Result<()> {
        let limit = query.options.limit;
        let mut emitted = 0usize;

        for location in &query.options.locations {
            info!("Searching '{}' in {} (limit {})", query.query, location, limit);
            let mut start = query.options.page_offset * PAGE_SIZE;

            while emitted < limit {
                let url = query.search_url(location, start);
                debug!("Fetching results page: {}", url);
                let html = self.get_page(&url)?;

                let cards = parse_cards(&html);
                if cards.is_empty() {
                    info!("No more results at offset {}", start);
                    break;
                }

                for card in cards {
                    if emitted >= limit {
                        break;
                    }
                    if !keep_card(&card, query.options.skip_promoted_jobs) {
                        debug!("Skipping promoted job: {}", card.link);
                        continue;
                    }

                    delay::slow_mo(self.slow_mo);
                    let record = self.assemble_record(card, query.options.apply_link);
                    on_data(record);
                    emitted += 1;
                }

                start += PAGE_SIZE;
                if emitted < limit {
                    delay::random_page_delay();
                }
            }

            if emitted >= limit {
                break;
            }
        }

        info!("Query '{}' finished: {} jobs emitted", query.query, emitted);
        Ok(())
    }

    fn assemble_record(&self, card: JobCard, want_apply_link: bool) -> JobRecord {
        let mut description = String::new();
        let mut insights = Vec::new();
        let mut apply_link = None;

        match &card.job_id {
            Some(id) => match self.fetch_detail(id) {
                Ok(detail) => {
                    description = detail.description;
                    insights = detail.insights;
                    if want_apply_link {
                        apply_link = detail.apply_link;
                    }
                }
                // One bad detail page should not sink the whole run.
                Err(e) => warn!("Failed to fetch details for {}: {}", card.link, e),
            },
            None => warn!("No job id found in {}", card.link),
        }

        JobRecord {
            title: card.title,
            company: card.company,
            company_link: card.company_link,
            date: card.date.unwrap_or_default(),
            link: card.link,
            insights,
            description,
            apply_link,
        }
    }

    fn fetch_detail(&self, job_id: &str) -> Result<JobDetail> {
        let url = format!("{}/{}", DETAIL_ENDPOINT, job_id);
        let html = self.get_page(&url)?;
        Ok(parse_detail(&html))
    }

    fn get_page(&self, url: &str) -> Result<String> {
        let ua = self.get_random_user_agent();
        let resp = self.client.get(url).header(USER_AGENT, ua).send()?;

        let status = resp.status();
        if status.as_u16() == 403 || status.as_u16() == 429 {
            return Err(format!("Blocked by remote ({}) at {}", status, url).into());
        }
        let resp = resp.error_for_status()?;
        Ok(resp.text()?)
    }
}

impl Default for LinkedinScraper {
    fn default() -> Self {
        LinkedinScraper::new(ScraperConfig::default())
    }
}

impl JobFetcher for LinkedinScraper {
    fn fetch(&self, query: &Query) -> Result<Vec<JobRecord>> {
        let mut records = Vec::new();
        self.run(std::slice::from_ref(query), |record| records.push(record))?;
        Ok(records)
    }
}

fn keep_card(card: &JobCard, skip_promoted_jobs: bool) -> bool {
    !(skip_promoted_jobs && card.date.is_none())
}

// The search endpoint returns a bare list of <li> cards, not a full document.
fn parse_cards(html: &str) -> Vec<JobCard> {
    let fragment = Html::parse_fragment(html);
    let card_selector = Selector::parse("li").unwrap();
    let title_selector = Selector::parse("h3.base-search-card__title").unwrap();
    let link_selector = Selector::parse("a.base-card__full-link").unwrap();
    let company_selector = Selector::parse("h4.base-search-card__subtitle a").unwrap();
    let location_selector = Selector::parse("span.job-search-card__location").unwrap();
    let urn_selector = Selector::parse("div.base-card").unwrap();
    let date_selector = Selector::parse("time").unwrap();

    let job_id_regex = Regex::new(r"(\d+)\s*$").unwrap();
    let mut cards = Vec::new();

    for element in fragment.select(&card_selector) {
        let title = match element.select(&title_selector).next() {
            Some(el) => el.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        let link = match element
            .select(&link_selector)
            .next()
            .and_then(|el| el.value().attr("href"))
        {
            Some(href) => href.trim().to_string(),
            None => continue,
        };

        let (company_name, company_link) = match element.select(&company_selector).next() {
            Some(el) => (
                el.text().collect::<String>().trim().to_string(),
                el.value().attr("href").unwrap_or_default().trim().to_string(),
            ),
            None => continue,
        };

        // The card shows company and location separately; records carry them
        // joined the way the listing page displays them.
        let location = element
            .select(&location_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let company = if location.is_empty() {
            company_name
        } else {
            format!("{}{}{}", company_name, COMPANY_SEPARATOR, location)
        };

        let date = element.select(&date_selector).next().map(|el| {
            el.value()
                .attr("datetime")
                .map(str::to_string)
                .unwrap_or_else(|| el.text().collect::<String>().trim().to_string())
        });

        let job_id = element
            .select(&urn_selector)
            .next()
            .and_then(|el| el.value().attr("data-entity-urn"))
            .and_then(|urn| job_id_regex.captures(urn))
            .or_else(|| {
                let path = link.split('?').next().unwrap_or("");
                job_id_regex.captures(path.trim_end_matches('/'))
            })
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        cards.push(JobCard {
            title,
            link,
            company,
            company_link,
            date,
            job_id,
        });
    }

    cards
}

fn parse_detail(html: &str) -> JobDetail {
    let document = Html::parse_document(html);
    let description_selector = Selector::parse("div.show-more-less-html__markup").unwrap();
    let criteria_selector = Selector::parse("li.description__job-criteria-item").unwrap();
    let criteria_header_selector = Selector::parse("h3.description__job-criteria-subheader").unwrap();
    let criteria_text_selector = Selector::parse("span.description__job-criteria-text").unwrap();
    let apply_selector = Selector::parse("code#applyUrl").unwrap();

    let description = document
        .select(&description_selector)
        .next()
        .map(|el| {
            el.text()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    let mut insights = Vec::new();
    for item in document.select(&criteria_selector) {
        let header = item
            .select(&criteria_header_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let value = item
            .select(&criteria_text_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        if !header.is_empty() && !value.is_empty() {
            insights.push(format!("{}: {}", header, value));
        }
    }

    // The apply URL ships inside an HTML comment in a hidden <code> tag.
    let apply_link = document
        .select(&apply_selector)
        .next()
        .map(|el| {
            el.inner_html()
                .trim()
                .trim_start_matches("<!--")
                .trim_end_matches("-->")
                .trim()
                .trim_matches('"')
                .to_string()
        })
        .filter(|link| link.starts_with("http"));

    JobDetail {
        description,
        insights,
        apply_link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"
        <li>
            <div class="base-card" data-entity-urn="urn:li:jobPosting:3544610012">
                <a class="base-card__full-link" href="https://se.linkedin.com/jobs/view/data-scientist-at-acme-3544610012?trk=guest">
                    <span class="sr-only">Data Scientist</span>
                </a>
                <div class="base-search-card__info">
                    <h3 class="base-search-card__title">Data Scientist</h3>
                    <h4 class="base-search-card__subtitle">
                        <a class="hidden-nested-link" href="https://www.linkedin.com/company/acme-corp">Acme Corp</a>
                    </h4>
                    <div class="base-search-card__metadata">
                        <span class="job-search-card__location">Stockholm</span>
                        <time class="job-search-card__listdate" datetime="2024-03-01">1 week ago</time>
                    </div>
                </div>
            </div>
        </li>
        <li>
            <div class="base-card">
                <a class="base-card__full-link" href="https://se.linkedin.com/jobs/view/ml-intern-at-globex-3544610099">
                    <span class="sr-only">ML Intern</span>
                </a>
                <div class="base-search-card__info">
                    <h3 class="base-search-card__title">ML Intern</h3>
                    <h4 class="base-search-card__subtitle">
                        <a class="hidden-nested-link" href="https://www.linkedin.com/company/globex">Globex</a>
                    </h4>
                    <div class="base-search-card__metadata">
                        <span class="job-search-card__location">Gothenburg</span>
                    </div>
                </div>
            </div>
        </li>
        <li>
            <div class="base-card">
                <h3 class="base-search-card__title">Card without link is dropped</h3>
            </div>
        </li>
    "#;

    const DETAIL_FIXTURE: &str = r#"
        <html><body>
            <section class="show-more-less-html">
                <div class="show-more-less-html__markup">
                    <p>We are hiring a data scientist.</p>
                    <p>Python required.</p>
                </div>
            </section>
            <ul class="description__job-criteria-list">
                <li class="description__job-criteria-item">
                    <h3 class="description__job-criteria-subheader">Seniority level</h3>
                    <span class="description__job-criteria-text">Entry level</span>
                </li>
                <li class="description__job-criteria-item">
                    <h3 class="description__job-criteria-subheader">Employment type</h3>
                    <span class="description__job-criteria-text">Full-time</span>
                </li>
            </ul>
            <code id="applyUrl" style="display: none"><!--"https://jobs.acme.example/apply/42"--></code>
        </body></html>
    "#;

    #[test]
    fn parses_listing_cards() {
        let cards = parse_cards(SEARCH_FIXTURE);
        assert_eq!(cards.len(), 2);

        let first = &cards[0];
        assert_eq!(first.title, "Data Scientist");
        assert_eq!(first.company, "Acme Corp · Stockholm");
        assert_eq!(first.company_link, "https://www.linkedin.com/company/acme-corp");
        assert_eq!(first.date.as_deref(), Some("2024-03-01"));
        assert_eq!(first.job_id.as_deref(), Some("3544610012"));
        assert!(first.link.contains("/jobs/view/data-scientist-at-acme-3544610012"));
    }

    #[test]
    fn promoted_card_has_no_date() {
        let cards = parse_cards(SEARCH_FIXTURE);
        assert!(cards[1].date.is_none());
        assert!(keep_card(&cards[1], false));
        assert!(!keep_card(&cards[1], true));
        assert!(keep_card(&cards[0], true));
    }

    #[test]
    fn job_id_falls_back_to_link_slug() {
        let cards = parse_cards(SEARCH_FIXTURE);
        // Second card carries no data-entity-urn; the id comes off the link.
        assert_eq!(cards[1].job_id.as_deref(), Some("3544610099"));
    }

    #[test]
    fn parses_detail_fragment() {
        let detail = parse_detail(DETAIL_FIXTURE);
        assert_eq!(
            detail.description,
            "We are hiring a data scientist.\nPython required."
        );
        assert_eq!(
            detail.insights,
            vec![
                "Seniority level: Entry level".to_string(),
                "Employment type: Full-time".to_string(),
            ]
        );
        assert_eq!(
            detail.apply_link.as_deref(),
            Some("https://jobs.acme.example/apply/42")
        );
    }

    #[test]
    fn detail_fields_degrade_to_empty() {
        let detail = parse_detail("<html><body><p>nothing here</p></body></html>");
        assert!(detail.description.is_empty());
        assert!(detail.insights.is_empty());
        assert!(detail.apply_link.is_none());
    }
}
