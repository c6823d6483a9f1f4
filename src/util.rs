use std::net::Ipv4Addr;

const HUB_PORT: &str = "ITOM_PORT";

const DEFAULT_PORT: u16 = 5000;

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(HUB_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const HUB_ADDR: &str = "ITOM_ADDR";

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_addr() -> Ipv4Addr {
    let addr_from_env = std::env::var(HUB_ADDR);
    addr_from_env.map_or(DEFAULT_ADDR, |res| res.parse().unwrap_or(DEFAULT_ADDR))
}

const HUB_CORS: &str = "ITOM_CORS";

/// CORS stays on unless explicitly disabled, Grafana needs it.
pub fn get_cors() -> bool {
    let cors_from_env = std::env::var(HUB_CORS);
    cors_from_env.map_or(true, |res| !matches!(res.as_str(), "0" | "false" | "off"))
}

/// Round to two decimal places, the precision of every fabricated reading.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
