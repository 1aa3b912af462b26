pub mod control;
pub mod network;
mod resources;
pub mod runner;
pub mod state;
mod urc_handler;

use core::mem::MaybeUninit;

use atat::asynch::{AtatClient, Client};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::{Read, Write};

use crate::config::CellularConfig;
use crate::digest::Bg770Digester;

pub use resources::Resources;
pub use runner::Runner;

use control::Control;
use network::NetDevice;

/// Shared access to the one AT client. Both the host-facing API and the
/// enablement driver go through here; the inner mutex serialises them onto
/// the single serial link.
pub struct AtHandle<'d, AT: AtatClient>(&'d Mutex<NoopRawMutex, AT>);

impl<'d, AT: AtatClient> AtHandle<'d, AT> {
    async fn send<Cmd: atat::AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, atat::Error> {
        self.0.lock().await.send(cmd).await
    }
}

/// Split one serial link into the three faces of the driver: the device
/// power/enablement driver, the host-facing control API and the background
/// runner that must be polled forever.
pub fn new_bg770<
    'a,
    R: Read,
    W: Write,
    C: CellularConfig,
    const CMD_BUF_SIZE: usize,
    const INGRESS_BUF_SIZE: usize,
    const URC_CAPACITY: usize,
>(
    reader: R,
    writer: W,
    resources: &'a mut Resources<W, CMD_BUF_SIZE, INGRESS_BUF_SIZE, URC_CAPACITY>,
    config: C,
) -> (
    NetDevice<'a, C, Client<'a, W, INGRESS_BUF_SIZE>>,
    Control<'a, Client<'a, W, INGRESS_BUF_SIZE>>,
    Runner<'a, R, INGRESS_BUF_SIZE, URC_CAPACITY>,
) {
    // safety: this is a self-referential struct, however:
    // - it can't move while the `'a` borrow is active.
    // - when the borrow ends, the dangling references inside the MaybeUninit
    //   will never be used again.
    let at_client_uninit: *mut MaybeUninit<Mutex<NoopRawMutex, Client<'a, W, INGRESS_BUF_SIZE>>> =
        (&mut resources.at_client
            as *mut MaybeUninit<Mutex<NoopRawMutex, Client<'static, W, INGRESS_BUF_SIZE>>>)
            .cast();

    unsafe { &mut *at_client_uninit }.write(Mutex::new(Client::new(
        writer,
        &resources.res_slot,
        &mut resources.cmd_buf,
        atat::Config::default(),
    )));

    let at_client = unsafe { (&*at_client_uninit).assume_init_ref() };

    let ch_runner = state::Runner::new(&mut resources.ch);

    let net_device = NetDevice::new(ch_runner.clone(), AtHandle(at_client), config);
    let control = Control::new(
        ch_runner.clone(),
        AtHandle(at_client),
        C::PSM_TIMER_RADIX,
        C::MAX_FILE_SIZE,
    );

    let ingress = atat::Ingress::new(
        Bg770Digester::new(),
        &mut resources.ingress_buf,
        &resources.res_slot,
        &resources.urc_channel,
    );

    let runner = Runner::new(ingress, reader, ch_runner, &resources.urc_channel);

    (net_device, control, runner)
}
