use std::sync::atomic::{AtomicU64, Ordering};

/// Intake outcome counters shared by all handlers.
#[derive(Default)]
pub struct IntakeMetrics {
    pub leads_created: AtomicU64,
    pub leads_rejected: AtomicU64,
    pub subscribers_created: AtomicU64,
    pub subscribers_rejected: AtomicU64,
    pub throttled: AtomicU64,
    pub auth_failed: AtomicU64,
}

impl IntakeMetrics {
    pub fn inc_lead_created(&self) {
        self.leads_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_lead_rejected(&self) {
        self.leads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_subscriber_created(&self) {
        self.subscribers_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_subscriber_rejected(&self) {
        self.subscribers_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_throttled(&self) {
        self.throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_auth_failed(&self) {
        self.auth_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Serialize to Prometheus text exposition format.
    pub fn to_prometheus_text(&self) -> String {
        let leads_created = self.leads_created.load(Ordering::Relaxed);
        let leads_rejected = self.leads_rejected.load(Ordering::Relaxed);
        let subs_created = self.subscribers_created.load(Ordering::Relaxed);
        let subs_rejected = self.subscribers_rejected.load(Ordering::Relaxed);
        let throttled = self.throttled.load(Ordering::Relaxed);
        let auth_failed = self.auth_failed.load(Ordering::Relaxed);

        format!(
            "# HELP lead_intake_leads_total Lead submissions by outcome\n\
             # TYPE lead_intake_leads_total counter\n\
             lead_intake_leads_total{{outcome=\"created\"}} {leads_created}\n\
             lead_intake_leads_total{{outcome=\"rejected\"}} {leads_rejected}\n\
             # HELP lead_intake_subscribers_total Newsletter submissions by outcome\n\
             # TYPE lead_intake_subscribers_total counter\n\
             lead_intake_subscribers_total{{outcome=\"created\"}} {subs_created}\n\
             lead_intake_subscribers_total{{outcome=\"rejected\"}} {subs_rejected}\n\
             # HELP lead_intake_throttled_total Requests refused by the rate limit\n\
             # TYPE lead_intake_throttled_total counter\n\
             lead_intake_throttled_total {throttled}\n\
             # HELP lead_intake_auth_failures_total Requests with a missing or wrong API key\n\
             # TYPE lead_intake_auth_failures_total counter\n\
             lead_intake_auth_failures_total {auth_failed}\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prometheus_text_reflects_counters() {
        let m = IntakeMetrics::default();
        m.inc_lead_created();
        m.inc_lead_created();
        m.inc_lead_rejected();
        m.inc_throttled();
        let text = m.to_prometheus_text();
        assert!(text.contains("lead_intake_leads_total{outcome=\"created\"} 2\n"));
        assert!(text.contains("lead_intake_leads_total{outcome=\"rejected\"} 1\n"));
        assert!(text.contains("lead_intake_subscribers_total{outcome=\"created\"} 0\n"));
        assert!(text.contains("lead_intake_throttled_total 1\n"));
        assert!(text.contains("lead_intake_auth_failures_total 0\n"));
    }
}
