//! Rendezvous between `AT+QIDNSGIP` and its `+QIURC: "dnsgip"` results.
//!
//! The modem acknowledges the query with a bare `OK` and delivers the actual
//! answer later as URCs: one header line (`<result>,<ip_count>[,<ttl>]`),
//! then one line per address. [`DnsTable`] pairs the caller blocked in
//! `get_host_by_name` with those URCs through a single-slot channel. The
//! async mutex serialises queries; without it two concurrent resolutions
//! would steal each other's result lines.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use heapless::String;

use crate::command::psn::urc::DnsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DnsQueryResult {
    Success,
    /// The modem reported a non-zero result code or zero addresses.
    Failed,
    Unknown,
}

/// What the waiting resolver receives once the query settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DnsSettlement {
    pub result: DnsQueryResult,
    /// First resolved address; empty on failure.
    pub address: String<64>,
}

/// State of the one in-flight query.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct PendingQuery {
    /// Address-line count announced by the header, if seen yet.
    pub expected: Option<u32>,
    /// Address lines consumed so far.
    pub consumed: u32,
    /// First resolved address, or the empty string on explicit failure.
    pub address: String<64>,
}

pub struct DnsTable {
    /// One query at a time, held from queue-drain to queue-receive.
    pub(crate) lock: Mutex<NoopRawMutex, ()>,
    pub(crate) queue: Channel<NoopRawMutex, DnsSettlement, 1>,
    pending: BlockingMutex<NoopRawMutex, RefCell<Option<PendingQuery>>>,
}

impl Default for DnsTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsTable {
    pub const fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            queue: Channel::new(),
            pending: BlockingMutex::new(RefCell::new(None)),
        }
    }

    /// Arm the table for a fresh query: drop stale results, register the
    /// pending cell. Caller must hold `lock`.
    pub(crate) fn arm(&self) {
        while self.queue.try_receive().is_ok() {}
        self.pending
            .lock(|p| p.replace(Some(PendingQuery::default())));
    }

    /// Disarm after timeout or failure to issue the query. Caller must hold
    /// `lock`.
    pub(crate) fn disarm(&self) {
        self.pending.lock(|p| p.take());
    }

    /// Feed one `"dnsgip"` URC line. Runs on the ingress side; posts to the
    /// queue when the query settles, which also unregisters the pending cell
    /// so late duplicate lines read as spurious.
    pub(crate) fn on_urc(&self, result: &DnsResult) {
        let settlement = self.pending.lock(|cell| {
            let mut cell = cell.borrow_mut();
            let verdict = interpret(cell.as_mut(), result)?;
            let pending = cell.take().unwrap_or_default();
            Some(DnsSettlement {
                result: verdict,
                address: pending.address,
            })
        });
        if let Some(settlement) = settlement {
            if self.queue.try_send(settlement).is_err() {
                warn!("DNS result with no waiting query");
            }
        }
    }
}

/// Pure verdict of one URC line against the pending state. `None` keeps
/// waiting (or marks a spurious line when nothing is pending).
fn interpret(pending: Option<&mut PendingQuery>, result: &DnsResult) -> Option<DnsQueryResult> {
    let Some(pending) = pending else {
        debug!("spurious dnsgip URC");
        return None;
    };
    match result {
        DnsResult::Header { result, ip_count } => {
            if *result != 0 || *ip_count == 0 {
                pending.address = String::new();
                return Some(DnsQueryResult::Failed);
            }
            pending.expected = Some(*ip_count);
            None
        }
        DnsResult::Address(ip) => match pending.expected {
            Some(expected) if pending.consumed < expected => {
                pending.address = ip.clone();
                pending.consumed += 1;
                Some(DnsQueryResult::Success)
            }
            _ => {
                debug!("spurious dnsgip address line");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(result: u32, ip_count: u32) -> DnsResult {
        DnsResult::Header { result, ip_count }
    }

    fn addr(s: &str) -> DnsResult {
        DnsResult::Address(String::try_from(s).unwrap())
    }

    #[test]
    fn success_takes_the_first_address() {
        let table = DnsTable::new();
        table.arm();
        table.on_urc(&header(0, 2));
        assert!(table.queue.try_receive().is_err());

        table.on_urc(&addr("93.184.216.34"));
        let settlement = table.queue.try_receive().unwrap();
        assert_eq!(settlement.result, DnsQueryResult::Success);
        assert_eq!(settlement.address.as_str(), "93.184.216.34");
    }

    #[test]
    fn explicit_failure_posts_failed_with_empty_address() {
        let table = DnsTable::new();
        table.arm();
        table.on_urc(&header(565, 0));
        let settlement = table.queue.try_receive().unwrap();
        assert_eq!(settlement.result, DnsQueryResult::Failed);
        assert!(settlement.address.is_empty());
    }

    #[test]
    fn zero_addresses_is_a_failure_even_with_result_ok() {
        let mut p = Some(PendingQuery::default());
        assert_eq!(
            interpret(p.as_mut(), &header(0, 0)),
            Some(DnsQueryResult::Failed)
        );
    }

    #[test]
    fn address_without_header_is_spurious() {
        let mut p = Some(PendingQuery::default());
        assert_eq!(interpret(p.as_mut(), &addr("10.0.0.1")), None);
        assert_eq!(p.unwrap().consumed, 0);
    }

    #[test]
    fn lines_after_settlement_are_spurious() {
        let table = DnsTable::new();
        table.arm();
        table.on_urc(&header(0, 2));
        table.on_urc(&addr("93.184.216.34"));
        // The second address arrives after the slot was cleared; the queued
        // settlement stays untouched.
        table.on_urc(&addr("93.184.216.35"));
        let settlement = table.queue.try_receive().unwrap();
        assert_eq!(settlement.address.as_str(), "93.184.216.34");
        assert!(table.queue.try_receive().is_err());
    }

    #[test]
    fn arm_drains_stale_results_and_disarm_clears_the_cell() {
        let table = DnsTable::new();
        table.arm();
        table.on_urc(&header(8, 0));

        table.arm();
        assert!(table.queue.try_receive().is_err());

        table.disarm();
        // Nothing pending: a late URC is spurious and posts nothing.
        table.on_urc(&addr("10.0.0.1"));
        assert!(table.queue.try_receive().is_err());
    }
}
