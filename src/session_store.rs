use std::collections::HashMap;
use std::sync::Mutex;
use linkedin_scraper_lib::JobRecord;

/// In-memory, process-lifetime result sets, one per UI session. A session's
/// records are replaced wholesale on every successful fetch, never merged.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Vec<JobRecord>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn count(&self, session_id: &str) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn replace(&self, session_id: &str, records: Vec<JobRecord>) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.to_string(), records);
    }

    pub fn get(&self, session_id: &str) -> Option<Vec<JobRecord>> {
        self.sessions.lock().unwrap().get(session_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            company: "Acme Corp · Stockholm".to_string(),
            company_link: String::new(),
            date: String::new(),
            link: format!("https://se.linkedin.com/jobs/view/{}", title),
            insights: Vec::new(),
            description: String::new(),
            apply_link: None,
        }
    }

    #[test]
    fn unknown_session_counts_zero() {
        let store = SessionStore::new();
        assert_eq!(store.count("nope"), 0);
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn replace_is_wholesale_not_merge() {
        let store = SessionStore::new();
        store.replace("s", vec![record("a"), record("b"), record("c")]);
        assert_eq!(store.count("s"), 3);

        store.replace("s", vec![record("d"), record("e")]);
        assert_eq!(store.count("s"), 2);
        let titles: Vec<String> = store
            .get("s")
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["d".to_string(), "e".to_string()]);
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::new();
        store.replace("a", vec![record("x")]);
        store.replace("b", vec![record("y"), record("z")]);
        assert_eq!(store.count("a"), 1);
        assert_eq!(store.count("b"), 2);
    }
}
