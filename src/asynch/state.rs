//! Process-wide per-modem state.
//!
//! One [`State`] exists per modem. Everything mutable sits behind a blocking
//! mutex + `RefCell`; writers are either an API caller or the URC handler,
//! never both for the same field, so the short critical sections are all the
//! synchronisation the fields need. The DNS table carries its own locking.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::WakerRegistration;

use crate::command::network_service::types::{RegistrationStat, SignalInfo};
use crate::command::network_service::urc::RegistrationUpdate;
use crate::dns::DnsTable;
use crate::socket::SocketSet;

/// Connect ids 0..=11 exist on the module.
pub const MAX_SOCKETS: usize = 12;

/// What the one-shot enablement sequence last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnablementOutcome {
    /// Not run yet, or aborted before the flow-control step.
    NotRun,
    /// Flow control was rewritten and the configuration asks to stop there;
    /// re-run the sequence after reconfiguring the host UART.
    SkippedAfterFlowControl,
    Completed,
}

pub struct State {
    shared: Mutex<NoopRawMutex, RefCell<Shared>>,
    dns: DnsTable,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                app_ready: false,
                enablement: EnablementOutcome::NotRun,
                eps_registration: RegistrationStat::NotRegistered,
                signal: SignalInfo {
                    rssi: None,
                    rsrp: None,
                    rsrq: None,
                    sinr: None,
                    ber: None,
                    bars: None,
                },
                sockets: SocketSet::new(),
                state_waker: WakerRegistration::new(),
                registration_waker: WakerRegistration::new(),
            })),
            dns: DnsTable::new(),
        }
    }
}

struct Shared {
    app_ready: bool,
    enablement: EnablementOutcome,
    eps_registration: RegistrationStat,
    signal: SignalInfo,
    sockets: SocketSet<MAX_SOCKETS>,
    state_waker: WakerRegistration,
    registration_waker: WakerRegistration,
}

#[derive(Clone)]
pub struct Runner<'d> {
    shared: &'d Mutex<NoopRawMutex, RefCell<Shared>>,
    dns: &'d DnsTable,
}

impl<'d> Runner<'d> {
    pub fn new(state: &'d mut State) -> Self {
        Self {
            shared: &state.shared,
            dns: &state.dns,
        }
    }

    pub(crate) fn dns(&self) -> &'d DnsTable {
        self.dns
    }

    pub(crate) fn set_app_ready(&self) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            s.app_ready = true;
            s.state_waker.wake();
        });
    }

    /// Forget a stale `APP RDY`, ahead of a power cycle.
    pub(crate) fn clear_app_ready(&self) {
        self.shared.lock(|s| s.borrow_mut().app_ready = false);
    }

    fn app_ready(&self, cx: Option<&mut Context>) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.state_waker.register(cx.waker());
            }
            s.app_ready
        })
    }

    pub async fn wait_for_app_ready(&self) {
        poll_fn(|cx| {
            if self.app_ready(Some(cx)) {
                return Poll::Ready(());
            }
            Poll::Pending
        })
        .await
    }

    pub(crate) fn set_enablement(&self, outcome: EnablementOutcome) {
        self.shared.lock(|s| s.borrow_mut().enablement = outcome);
    }

    /// Whether the last enablement run completed, stopped early for the UART
    /// reconfiguration, or never happened.
    pub fn enablement(&self) -> EnablementOutcome {
        self.shared.lock(|s| s.borrow().enablement)
    }

    pub(crate) fn update_registration(&self, update: &RegistrationUpdate) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.eps_registration != update.stat {
                s.eps_registration = update.stat;
                info!(
                    "Registration status changed! Registered: {:?}",
                    update.stat.is_registered()
                );
                s.registration_waker.wake();
            }
        });
    }

    pub fn is_registered(&self, cx: Option<&mut Context>) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.registration_waker.register(cx.waker());
            }
            s.eps_registration.is_registered()
        })
    }

    pub async fn wait_registration_change(&self) -> bool {
        let old_state = self
            .shared
            .lock(|s| s.borrow().eps_registration.is_registered());

        poll_fn(|cx| {
            let current_state = self.is_registered(Some(cx));
            if current_state != old_state {
                return Poll::Ready(current_state);
            }
            Poll::Pending
        })
        .await
    }

    pub(crate) fn update_signal(&self, rssi_dbm: Option<i16>, ber: Option<u8>) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            s.signal.rssi = rssi_dbm;
            s.signal.ber = ber;
        });
    }

    /// Last signal report pushed by the modem, if URC reporting is on.
    pub fn last_signal(&self) -> SignalInfo {
        self.shared.lock(|s| s.borrow().signal.clone())
    }

    pub(crate) fn with_sockets<R>(&self, f: impl FnOnce(&mut SocketSet<MAX_SOCKETS>) -> R) -> R {
        self.shared.lock(|s| f(&mut s.borrow_mut().sockets))
    }
}
