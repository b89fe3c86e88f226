//! Unit categories — static severity and impact text per kind of unit.
//!
//! Categories are tested in table order and the first whose keyword is
//! contained in the unit name wins, so more specific keywords come first
//! (`mongodb-backup` is a backup, not storage). [`GENERIC`] catches
//! everything else.

const PANIC_GUIDE: &str = "https://dewey.ft.com/fleet-unit-healthcheck.html";
const GENERIC_TEXT: &str = "View this services healthcheck, from main cluster health page, for recovery information and panic guide";
const RESTART_REQUIRED: &str = "This app is not healthy, restart required";

/// Metadata attached to every check of a given kind of unit.
#[derive(Debug, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    /// Substrings of the unit name that select this category.
    pub keywords: &'static [&'static str],
    /// 1 is most critical.
    pub severity: u8,
    pub technical_summary: &'static str,
    pub business_impact: &'static str,
    pub panic_guide: &'static str,
}

pub static CATEGORIES: &[Category] = &[
    Category {
        name: "sidekick",
        keywords: &["sidekick"],
        severity: 3,
        technical_summary: "This sidekick unit is not healthy, restart required",
        business_impact: "The associated app may not be receiving/forwarding requests properly",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "queue",
        keywords: &["kafka", "zookeeper"],
        severity: 1,
        technical_summary: "This unit is not healthy. Kafka, Zookeeper and the proxy are essential to publishing content to the website",
        business_impact: "Content is not being published; the website will become stale",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "cache",
        keywords: &["varnish"],
        severity: 1,
        technical_summary: "Varnish cache not running, restart required",
        business_impact: "All requests to access content will hit backend and may take longer than desired",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "routing",
        keywords: &["vulcan"],
        severity: 1,
        technical_summary: "Vulcan routes requests, restart required",
        business_impact: "Routing of requests on this machine may be failing",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "aggregate-healthcheck",
        keywords: &["aggregate-healthcheck"],
        severity: 1,
        technical_summary: "Monitors health of services running in the cluster",
        business_impact: "Application health is not being monitored if this check return false",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "timer",
        keywords: &["timer"],
        severity: 2,
        technical_summary: RESTART_REQUIRED,
        business_impact: "Database backups will not run if this service is unhealthy",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "backup",
        keywords: &["backup"],
        severity: 2,
        technical_summary: "Database backup service not running; try restarting",
        business_impact: "Restoration of clusters will be slow without recent backups",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "storage",
        keywords: &["mongodb"],
        severity: 1,
        technical_summary: "Stores all CAPI v2 content; restart required",
        business_impact: "Customer requests may take longer than expected or return errors",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "transformer",
        keywords: &["transformer"],
        severity: 2,
        technical_summary: "Transforms content between internal models; restart required",
        business_impact: "Customer requests may take longer than expected or return errors",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "logger",
        keywords: &["logger"],
        severity: 2,
        technical_summary: RESTART_REQUIRED,
        business_impact: "Logs from database will be lost",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "lag-monitor",
        keywords: &["burrow"],
        severity: 2,
        technical_summary: RESTART_REQUIRED,
        business_impact: "Kafka lagcheck service will not report kafka lags",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "cluster-bootstrap",
        keywords: &["elb", "tunnel-registrator"],
        severity: 2,
        technical_summary: "Should only alert on cluster creation, try restarting",
        business_impact: "Should only alert on cluster creation",
        panic_guide: PANIC_GUIDE,
    },
    Category {
        name: "infrastructure",
        keywords: &["splunk-forwarder", "diamond", "image-cleaner"],
        severity: 2,
        technical_summary: RESTART_REQUIRED,
        business_impact: "",
        panic_guide: PANIC_GUIDE,
    },
];

/// Fallback for units no keyword matches.
pub static GENERIC: Category = Category {
    name: "generic",
    keywords: &[],
    severity: 2,
    technical_summary: GENERIC_TEXT,
    business_impact: GENERIC_TEXT,
    panic_guide: GENERIC_TEXT,
};

/// Category for a unit name. Never fails; unknown units are [`GENERIC`].
pub fn lookup(unit_name: &str) -> &'static Category {
    CATEGORIES
        .iter()
        .find(|c| c.keywords.iter().any(|k| unit_name.contains(k)))
        .unwrap_or(&GENERIC)
}
