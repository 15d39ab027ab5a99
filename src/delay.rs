use std::time::Duration;
use std::thread;
use rand::Rng;
use log::{debug, info};

// Short pause before each per-job detail fetch, with a little jitter on top.
pub fn slow_mo(base: Duration) {
    let mut rng = rand::thread_rng();
    let jitter = rng.gen_range(0..=250);
    let wait = base + Duration::from_millis(jitter);
    debug!("Waiting {:?} before next request...", wait);
    thread::sleep(wait);
}

pub fn random_page_delay() {
    let mut rng = rand::thread_rng();
    let delay_secs = rng.gen_range(1..=3);
    info!("Waiting for {} seconds (Page Delay)...", delay_secs);
    thread::sleep(Duration::from_secs(delay_secs));
}
