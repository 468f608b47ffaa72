//! Static log corpora used across harnesses.

/// Raw lines and the log key each must normalise to.
pub const NORMALIZATION_CASES: &[(&str, &str)] = &[
    (
        "2025-09-04 10:15:30 INFO User 12345 logged in from 10.0.0.5",
        "INFO User <NUM> logged in from <IP>",
    ),
    (
        "2025-09-04T10:15:31 WARN Failed to open /var/tmp/cache file",
        "WARN Failed to open /var/tmp/cache file",
    ),
    (
        "2025-09-04 10:15:32 ERROR Connection timeout after 50000 ms",
        "ERROR Connection timeout after <NUM> ms",
    ),
    (
        "2024-01-15 10:00:04 DEBUG dial tcp 192.168.1.20:5432 established",
        "DEBUG dial tcp <IP>:5432 established",
    ),
    ("   GET   /api/v1/users\t200   47ms  ", "GET /api/v1/users 200 47ms"),
    ("job 4242 finished", "job 4242 finished"),
    ("2025-09-04 10:15:30", ""),
    ("", ""),
];

/// A realistic service log: a repeating healthy cycle with a burst of errors.
pub const CORPUS_SERVICE: &[&str] = &[
    "2025-09-04 10:15:30 INFO User 12345 logged in from 10.0.0.5",
    "2025-09-04 10:15:31 INFO User 12345 requested /api/data",
    "2025-09-04 10:15:32 INFO User 12345 logged out",
    "2025-09-04 10:15:33 INFO User 23456 logged in from 10.0.0.6",
    "2025-09-04 10:15:34 INFO User 23456 requested /api/data",
    "2025-09-04 10:15:35 INFO User 23456 logged out",
    "2025-09-04 10:15:36 ERROR Connection timeout after 50000 ms",
    "2025-09-04 10:15:37 ERROR Connection timeout after 50001 ms",
    "2025-09-04 10:15:38 WARN Failed to open /var/tmp/cache file",
    "2025-09-04 10:15:39 INFO User 34567 logged in from 10.0.0.7",
    "2025-09-04 10:15:40 INFO User 34567 requested /api/data",
    "2025-09-04 10:15:41 INFO User 34567 logged out",
];

/// `n` lines cycling through [`CORPUS_SERVICE`].
pub fn service_lines(n: usize) -> Vec<String> {
    CORPUS_SERVICE
        .iter()
        .cycle()
        .take(n)
        .map(|l| l.to_string())
        .collect()
}
