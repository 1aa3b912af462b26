use atat::{UrcChannel, UrcSubscription};

use crate::command::Urc;

use super::{runner::URC_SUBSCRIBERS, state};

pub struct UrcHandler<'a, const URC_CAPACITY: usize> {
    ch: state::Runner<'a>,
    urc_subscription: UrcSubscription<'a, Urc, URC_CAPACITY, URC_SUBSCRIBERS>,
}

impl<'a, const URC_CAPACITY: usize> UrcHandler<'a, URC_CAPACITY> {
    pub fn new(
        ch: state::Runner<'a>,
        urc_channel: &'a UrcChannel<Urc, URC_CAPACITY, URC_SUBSCRIBERS>,
    ) -> Self {
        Self {
            ch,
            urc_subscription: urc_channel.subscribe().unwrap(),
        }
    }

    pub async fn run(&mut self) -> ! {
        loop {
            let event = self.urc_subscription.next_message_pure().await;
            self.handle_urc(event);
        }
    }

    fn handle_urc(&mut self, event: Urc) {
        match event {
            Urc::AppReady => {
                debug!("Module AT interpreter ready");
                self.ch.set_app_ready();
            }
            Urc::ModuleReady => debug!("Module booted"),
            Urc::PoweredDown => warn!("Module powered down"),
            Urc::PsmPowerDown => info!("Module entered PSM"),
            Urc::PsmTimer { tau, active } => {
                info!("Network granted PSM timers: TAU {}s, active {}s", tau, active)
            }
            Urc::SocketOpened(result) | Urc::SslSocketOpened(result) => {
                self.ch.with_sockets(|sockets| {
                    if let Ok(socket) =
                        sockets.get(crate::socket::SocketHandle(result.socket_id))
                    {
                        socket.connect_result(result.is_connected());
                    }
                });
                if !result.is_connected() {
                    warn!(
                        "Socket {} failed to connect: {}",
                        result.socket_id, result.error
                    );
                }
            }
            Urc::SocketClosed(id) | Urc::SslSocketClosed(id) => {
                warn!("Socket {} closed by peer or network", id);
                self.ch.with_sockets(|sockets| {
                    if let Ok(socket) = sockets.get(crate::socket::SocketHandle(id)) {
                        socket.remote_closed();
                    }
                });
            }
            Urc::SocketDataAvailable(id) | Urc::SslSocketDataAvailable(id) => {
                trace!("Socket {} has buffered data", id)
            }
            Urc::DnsResult(result) => self.ch.dns().on_urc(&result),
            Urc::PdpDeactivated(p) => {
                warn!("PDP context {} deactivated by the network", p.context_id.0)
            }
            Urc::SignalStrength(s) => self.ch.update_signal(s.rssi_dbm, s.ber),
            Urc::NetworkRegistration(reg) | Urc::EpsNetworkRegistration(reg) => {
                self.ch.update_registration(&reg);
            }
            Urc::TimeZoneUpdate(tz) => debug!("Network time zone: {}", tz.as_str()),
        }
    }
}
