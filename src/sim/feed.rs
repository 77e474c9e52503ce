//! Random threat generation

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{HONEYPOT_ID_SPACE, SAMPLE_WINDOW_DAYS};
use crate::models::{Finding, NewThreat, PenTestReport, Severity, ThreatStatus};

const THREAT_TYPES: &[&str] = &[
    "SSH Brute Force Attack",
    "SQL Injection Attempt",
    "DDoS Attack",
    "Port Scanning",
    "Malware Download",
    "Credential Stuffing",
    "Web Application Attack",
    "Network Intrusion",
];

const ATTACK_VECTORS: &[&str] = &["SSH", "HTTP", "HTTPS", "TCP", "UDP", "FTP", "SMTP"];

const LOCATIONS: &[&str] = &[
    "Beijing, China",
    "Moscow, Russia",
    "Seoul, South Korea",
    "Mumbai, India",
    "São Paulo, Brazil",
    "Lagos, Nigeria",
    "Bangkok, Thailand",
    "Warsaw, Poland",
];

const SEVERITIES: &[Severity] = &[
    Severity::Critical,
    Severity::High,
    Severity::Medium,
    Severity::Low,
];

const STATUSES: &[ThreatStatus] = &[
    ThreatStatus::Active,
    ThreatStatus::Investigating,
    ThreatStatus::Mitigated,
];

/// Source of threat detections. Implemented by the simulator here and,
/// eventually, by real sensor collectors.
pub trait ThreatFeed {
    /// Produce the next batch of detections.
    fn collect(&mut self, count: usize) -> Vec<NewThreat>;
}

/// Random feed producing plausible attack events: HP-xxx honeypot ids,
/// dotted-quad source addresses and detection times within the last
/// [`SAMPLE_WINDOW_DAYS`] days.
pub struct SimulatedFeed<R: Rng> {
    rng: R,
}

impl<R: Rng> SimulatedFeed<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn random_threat(&mut self) -> NewThreat {
        let now = Utc::now();
        let window_secs = Duration::days(SAMPLE_WINDOW_DAYS).num_seconds();
        let offset_secs = self.rng.gen_range(0..window_secs);
        let detection_time = now - Duration::seconds(offset_secs);

        let source_ip = format!(
            "{}.{}.{}.{}",
            self.rng.gen_range(1..=254u8),
            self.rng.gen_range(0..=255u8),
            self.rng.gen_range(0..=255u8),
            self.rng.gen_range(1..=254u8),
        );

        NewThreat {
            honeypot_id: format!("HP-{:03}", self.rng.gen_range(0..HONEYPOT_ID_SPACE)),
            threat_type: THREAT_TYPES.choose(&mut self.rng).unwrap().to_string(),
            severity: *SEVERITIES.choose(&mut self.rng).unwrap(),
            source_ip,
            location: Some(LOCATIONS.choose(&mut self.rng).unwrap().to_string()),
            attack_vector: Some(ATTACK_VECTORS.choose(&mut self.rng).unwrap().to_string()),
            detection_time: Some(detection_time),
            status: *STATUSES.choose(&mut self.rng).unwrap(),
            details: Some(
                "Automated attack detected from suspicious IP address. Pattern analysis \
                 indicates coordinated threat activity."
                    .to_string(),
            ),
        }
    }
}

impl<R: Rng> ThreatFeed for SimulatedFeed<R> {
    fn collect(&mut self, count: usize) -> Vec<NewThreat> {
        (0..count).map(|_| self.random_threat()).collect()
    }
}

/// Canned penetration-test findings for simulated runs.
pub fn pen_test_report() -> PenTestReport {
    PenTestReport {
        findings: vec![
            Finding {
                title: "Outdated software versions".to_string(),
                severity: Severity::High,
                description: "Several exposed services run versions with known CVEs".to_string(),
                affected_systems: vec!["web-01".to_string(), "mail-01".to_string()],
                recommendation: "Update all systems to latest security patches".to_string(),
            },
            Finding {
                title: "Weak password policy".to_string(),
                severity: Severity::Medium,
                description: "Password complexity requirements are not enforced".to_string(),
                affected_systems: vec!["ad-01".to_string()],
                recommendation: "Implement stronger password policies and multi-factor authentication"
                    .to_string(),
            },
            Finding {
                title: "Unnecessary open ports".to_string(),
                severity: Severity::Low,
                description: "Legacy services listen on ports with no active consumers".to_string(),
                affected_systems: vec!["db-02".to_string()],
                recommendation: "Close unnecessary ports and disable unused services".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_threats_stay_in_closed_sets() {
        let mut feed = SimulatedFeed::new(StdRng::seed_from_u64(7));
        for threat in feed.collect(200) {
            assert!(SEVERITIES.contains(&threat.severity));
            assert!(STATUSES.contains(&threat.status));
            assert!(THREAT_TYPES.contains(&threat.threat_type.as_str()));
            assert!(ATTACK_VECTORS.contains(&threat.attack_vector.as_deref().unwrap()));
        }
    }

    #[test]
    fn test_detection_times_never_in_future() {
        let mut feed = SimulatedFeed::new(StdRng::seed_from_u64(42));
        let threats = feed.collect(100);
        let now = Utc::now();
        for threat in threats {
            assert!(threat.detection_time.unwrap() <= now);
        }
    }

    #[test]
    fn test_source_ips_are_dotted_quads() {
        let mut feed = SimulatedFeed::new(StdRng::seed_from_u64(1));
        for threat in feed.collect(50) {
            let octets: Vec<&str> = threat.source_ip.split('.').collect();
            assert_eq!(octets.len(), 4);
            for octet in octets {
                octet.parse::<u8>().expect("octet in 0..=255");
            }
        }
    }

    #[test]
    fn test_honeypot_id_format() {
        let mut feed = SimulatedFeed::new(StdRng::seed_from_u64(3));
        for threat in feed.collect(50) {
            assert!(threat.honeypot_id.starts_with("HP-"));
            assert_eq!(threat.honeypot_id.len(), 6);
        }
    }

    #[test]
    fn test_report_has_typed_findings() {
        let report = pen_test_report();
        assert_eq!(report.findings.len(), 3);
        assert_eq!(report.count_at(Severity::High), 1);
    }
}
