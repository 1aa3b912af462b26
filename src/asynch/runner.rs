use atat::{AtatIngress, Ingress, UrcChannel};
use embedded_io_async::Read;

use crate::command::Urc;
use crate::digest::Bg770Digester;

use super::state;
use super::urc_handler::UrcHandler;

pub const URC_SUBSCRIBERS: usize = 1;

/// Background half of the driver: pumps serial bytes through the digester
/// and dispatches URCs. Must run for as long as the modem is powered.
pub struct Runner<'a, R: Read, const INGRESS_BUF_SIZE: usize, const URC_CAPACITY: usize> {
    ingress: Ingress<'a, Bg770Digester, Urc, INGRESS_BUF_SIZE, URC_CAPACITY, URC_SUBSCRIBERS>,
    reader: R,
    urc_handler: UrcHandler<'a, URC_CAPACITY>,
}

impl<'a, R: Read, const INGRESS_BUF_SIZE: usize, const URC_CAPACITY: usize>
    Runner<'a, R, INGRESS_BUF_SIZE, URC_CAPACITY>
{
    pub(crate) fn new(
        ingress: Ingress<'a, Bg770Digester, Urc, INGRESS_BUF_SIZE, URC_CAPACITY, URC_SUBSCRIBERS>,
        reader: R,
        ch: state::Runner<'a>,
        urc_channel: &'a UrcChannel<Urc, URC_CAPACITY, URC_SUBSCRIBERS>,
    ) -> Self {
        Self {
            ingress,
            reader,
            urc_handler: UrcHandler::new(ch, urc_channel),
        }
    }

    pub async fn run(mut self) -> ! {
        embassy_futures::join::join(
            self.ingress.read_from(&mut self.reader),
            self.urc_handler.run(),
        )
        .await;
        core::unreachable!()
    }
}
