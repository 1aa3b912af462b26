use core::mem::MaybeUninit;

use atat::asynch::Client;
use atat::{ResponseSlot, UrcChannel};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::Write;

use crate::command::Urc;

use super::{runner::URC_SUBSCRIBERS, state};

pub struct Resources<
    W: Write,
    const CMD_BUF_SIZE: usize,
    const INGRESS_BUF_SIZE: usize,
    const URC_CAPACITY: usize,
> {
    pub(crate) ch: state::State,

    pub(crate) res_slot: ResponseSlot<INGRESS_BUF_SIZE>,
    pub(crate) urc_channel: UrcChannel<Urc, URC_CAPACITY, URC_SUBSCRIBERS>,
    pub(crate) cmd_buf: [u8; CMD_BUF_SIZE],
    pub(crate) ingress_buf: [u8; INGRESS_BUF_SIZE],

    pub(crate) at_client:
        MaybeUninit<Mutex<NoopRawMutex, Client<'static, W, INGRESS_BUF_SIZE>>>,
}

impl<
        W: Write,
        const CMD_BUF_SIZE: usize,
        const INGRESS_BUF_SIZE: usize,
        const URC_CAPACITY: usize,
    > Default for Resources<W, CMD_BUF_SIZE, INGRESS_BUF_SIZE, URC_CAPACITY>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<
        W: Write,
        const CMD_BUF_SIZE: usize,
        const INGRESS_BUF_SIZE: usize,
        const URC_CAPACITY: usize,
    > Resources<W, CMD_BUF_SIZE, INGRESS_BUF_SIZE, URC_CAPACITY>
{
    pub fn new() -> Self {
        Self {
            ch: state::State::new(),

            res_slot: ResponseSlot::new(),
            urc_channel: UrcChannel::new(),
            cmd_buf: [0; CMD_BUF_SIZE],
            ingress_buf: [0; INGRESS_BUF_SIZE],

            at_client: MaybeUninit::uninit(),
        }
    }
}
