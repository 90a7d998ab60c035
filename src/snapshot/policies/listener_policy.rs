pub const HTTPS_PORT: u16 = 443;
pub const HTTP_PORT: u16 = 80;

/// Picks the listener that represents the application's public entry point.
///
/// Port 443 wins over port 80. Listeners on any other port are never
/// selected; callers keep the `HTTP`/`80` defaults instead.
pub struct ListenerPolicy;

impl ListenerPolicy {
    pub fn select<L>(listeners: &[L], port_of: impl Fn(&L) -> u16) -> Option<&L> {
        listeners
            .iter()
            .find(|listener| port_of(listener) == HTTPS_PORT)
            .or_else(|| {
                listeners
                    .iter()
                    .find(|listener| port_of(listener) == HTTP_PORT)
            })
    }
}
