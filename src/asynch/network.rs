//! Power sequencing and the one-shot module enablement sequence.
//!
//! Bring-up is deliberately read-before-write: every setting the sequence
//! manages persists in the modem NV, and rewriting an unchanged value can
//! force a full network re-scan. On a fleet that power-cycles daily, blind
//! writes cost real airtime.

use atat::asynch::AtatClient;
use embassy_time::{with_timeout, Duration, Timer};
use embedded_hal::digital::{InputPin, OutputPin};

use crate::command::control::types::{DtrFunction, Echo, FlowControlMode, FlowControlValue};
use crate::command::control::{GetFlowControl, SetDtrFunction, SetEcho, SetFlowControl};
use crate::command::mobile_control::types::{Functionality, TimeZoneReportingMode};
use crate::command::mobile_control::{GetModuleFunctionality, SetModuleFunctionality, SetTimeZoneReporting};
use crate::command::network_service::types::{
    OperatorNameFormat, OperatorSelectionMode, RegistrationUrcConfig,
};
use crate::command::network_service::{
    SetEpsNetworkRegistrationStatus, SetNetworkRegistrationStatus, SetOperatorSelection,
};
use crate::command::system_features::types::IotOpMode;
use crate::command::system_features::{
    GetIotOpMode, GetLwm2m, GetScanSequence, GetUrcPort, SetIotOpMode, SetLwm2m, SetPsmUrc,
    SetScanSequence, SetUrcPort,
};
use crate::command::AT;
use crate::config::CellularConfig;
use crate::error::Error;
use crate::module_timing::{app_ready_settle_time, app_ready_time, pwr_off_time, pwr_on_time, reset_time};

use super::state::{self, EnablementOutcome};
use super::AtHandle;

/// Enablement-step retry policy: up to 4 attempts with a quadratically
/// growing back-off (1 s, 4 s, 9 s).
const RETRY_ATTEMPTS: u32 = 4;
const RETRY_BASE: Duration = Duration::from_millis(1000);

/// The initial `AT` probe answers fast or not at all; back off in 100 ms
/// steps instead.
const PROBE_BASE: Duration = Duration::from_millis(100);

/// Device-level driver: pin power sequencing plus the ordered enablement
/// ("enable UE") sequence that takes a cold-booted module to SIM-ready.
pub struct NetDevice<'a, C: CellularConfig, AT: AtatClient> {
    ch: state::Runner<'a>,
    config: C,
    at: AtHandle<'a, AT>,
}

impl<'a, C: CellularConfig, AT: AtatClient> NetDevice<'a, C, AT> {
    pub(crate) fn new(ch: state::Runner<'a>, at: AtHandle<'a, AT>, config: C) -> Self {
        Self { ch, config, at }
    }

    /// Send with the enablement retry policy.
    async fn send_retry<Cmd: atat::AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, Error> {
        self.send_backoff(cmd, RETRY_ATTEMPTS, RETRY_BASE).await
    }

    async fn send_backoff<Cmd: atat::AtatCmd>(
        &mut self,
        cmd: &Cmd,
        attempts: u32,
        base: Duration,
    ) -> Result<Cmd::Response, Error> {
        let mut attempt = 1;
        loop {
            match self.at.send(cmd).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt >= attempts {
                        return Err(e.into());
                    }
                    Timer::after(base * (attempt * attempt)).await;
                    attempt += 1;
                }
            }
        }
    }

    pub fn has_power(&mut self) -> Result<bool, Error> {
        if let Some(pin) = self.config.status_pin() {
            pin.is_high().map_err(|_| Error::InternalFailure)
        } else {
            debug!("No STATUS pin configured");
            Ok(true)
        }
    }

    /// Pulse `PWRKEY` to switch the module on. Completion shows up as the
    /// `APP RDY` URC, which [`Self::enable_ue`] waits for.
    pub async fn power_up(&mut self) -> Result<(), Error> {
        self.ch.clear_app_ready();
        self.ch.set_enablement(EnablementOutcome::NotRun);

        if let Some(pin) = self.config.power_pin() {
            pin.set_low().ok();
            Timer::after(pwr_on_time()).await;
            pin.set_high().ok();
            debug!("Powered up");
        } else {
            warn!("No power pin configured");
        }
        Ok(())
    }

    /// Pulse `PWRKEY` long enough for a graceful switch off. Prefer
    /// `Control::power_down`, which detaches from the network first.
    pub async fn hard_power_off(&mut self) -> Result<(), Error> {
        if let Some(pin) = self.config.power_pin() {
            pin.set_low().ok();
            Timer::after(pwr_off_time()).await;
            pin.set_high().ok();
            self.ch.clear_app_ready();
            debug!("Powered down");
        } else {
            warn!("No power pin configured");
        }
        Ok(())
    }

    /// Hard reset via `RESET_N`.
    ///
    /// **NOTE** Quectel reserves this for unresponsive modules; settings not
    /// yet persisted are lost.
    pub async fn reset(&mut self) -> Result<(), Error> {
        warn!("Hard resetting the module");
        self.ch.clear_app_ready();
        self.ch.set_enablement(EnablementOutcome::NotRun);
        if let Some(pin) = self.config.reset_pin() {
            pin.set_low().ok();
            Timer::after(reset_time()).await;
            pin.set_high().ok();
        } else {
            warn!("No reset pin configured");
        }
        Ok(())
    }

    /// One-shot enablement: cold boot through SIM-ready.
    ///
    /// Ordered, idempotent, and read-before-write throughout. Returns early
    /// with [`EnablementOutcome::SkippedAfterFlowControl`] recorded when the
    /// flow-control agreement changed and the configuration asks the host to
    /// reconfigure its UART before anything else runs.
    pub async fn enable_ue(&mut self) -> Result<(), Error> {
        // The interpreter announces itself once; a module already up has the
        // flag latched from the previous URC.
        if with_timeout(app_ready_time(), self.ch.wait_for_app_ready())
            .await
            .is_err()
        {
            warn!("APP RDY did not arrive; probing anyway");
        }
        Timer::after(app_ready_settle_time()).await;

        self.send_backoff(&AT, RETRY_ATTEMPTS, PROBE_BASE).await?;

        self.send_retry(&SetEcho { enabled: Echo::Off }).await?;

        self.send_retry(&SetDtrFunction {
            mode: DtrFunction::Ignore,
        })
        .await?;

        if self.configure_flow_control().await? {
            info!("Flow control changed; deferring the rest of the enablement");
            self.ch
                .set_enablement(EnablementOutcome::SkippedAfterFlowControl);
            return Ok(());
        }

        self.configure_cfun().await?;
        self.configure_urc_port().await?;
        self.configure_iotopmode().await?;
        self.configure_scan_sequence().await?;
        self.configure_lwm2m().await?;

        self.ch.set_enablement(EnablementOutcome::Completed);

        self.enable_urcs().await;
        Ok(())
    }

    /// Returns whether a write was needed, for the short-circuit decision.
    async fn configure_flow_control(&mut self) -> Result<bool, Error> {
        let desired = if C::FLOW_CONTROL {
            (FlowControlValue::RtsCts, FlowControlMode::RtsCts)
        } else {
            (FlowControlValue::None, FlowControlMode::None)
        };

        let report = self.send_retry(&GetFlowControl).await?;
        if FlowControlMode::from_pair(report.dce_by_dte, report.dte_by_dce) == desired.1 {
            debug!("Flow control already set, skipping");
            return Ok(false);
        }

        self.send_retry(&SetFlowControl {
            dce_by_dte: desired.0,
            dte_by_dce: desired.0,
        })
        .await?;
        Ok(C::SKIP_SETUP_AFTER_FLOW_CONTROL_CHANGE)
    }

    async fn configure_cfun(&mut self) -> Result<(), Error> {
        let current = self.send_retry(&GetModuleFunctionality).await?;
        if current.fun == Some(Functionality::SimOnly) {
            debug!("CFUN already set, skipping");
            return Ok(());
        }
        self.send_retry(&SetModuleFunctionality {
            fun: Functionality::SimOnly,
        })
        .await
        .map(drop)
    }

    async fn configure_urc_port(&mut self) -> Result<(), Error> {
        let current = self.send_retry(&GetUrcPort).await?;
        if current.port == Some(C::URC_PORT) {
            debug!("URC port already set, skipping");
            return Ok(());
        }
        self.send_retry(&SetUrcPort { port: C::URC_PORT }).await.map(drop)
    }

    async fn configure_iotopmode(&mut self) -> Result<(), Error> {
        let current = self.send_retry(&GetIotOpMode).await?;
        if current.mode == IotOpMode::EMtc {
            debug!("iotopmode already set, skipping");
            return Ok(());
        }
        self.send_retry(&SetIotOpMode {
            mode: IotOpMode::EMtc,
        })
        .await
        .map(drop)
    }

    async fn configure_scan_sequence(&mut self) -> Result<(), Error> {
        let current = self.send_retry(&GetScanSequence).await?;
        if current.sequence.matches(&C::SCAN_SEQUENCE) {
            debug!("Scan sequence already set, skipping");
            return Ok(());
        }
        self.send_retry(&SetScanSequence {
            sequence: C::SCAN_SEQUENCE,
        })
        .await
        .map(drop)
    }

    async fn configure_lwm2m(&mut self) -> Result<(), Error> {
        let current = self.send_retry(&GetLwm2m).await?;
        if !current.enabled {
            debug!("LwM2M already disabled, skipping");
            return Ok(());
        }
        // Left enabled, some carrier SIMs override the user APN with the
        // LwM2M bootstrap one.
        self.send_retry(&SetLwm2m { enabled: false }).await.map(drop)
    }

    /// Post-sequence URC enablement. Fire and forget: a module that refuses
    /// one of these still works, the host just sees fewer push updates.
    async fn enable_urcs(&mut self) {
        if let Err(e) = self
            .at
            .send(&SetOperatorSelection {
                mode: OperatorSelectionMode::SetFormatOnly,
                format: Some(OperatorNameFormat::Numeric),
                operator: None,
            })
            .await
        {
            warn!("Failed to set operator format: {:?}", e);
        }
        if let Err(e) = self
            .at
            .send(&SetNetworkRegistrationStatus {
                n: RegistrationUrcConfig::EnabledWithLocation,
            })
            .await
        {
            warn!("Failed to enable +CREG URCs: {:?}", e);
        }
        if let Err(e) = self
            .at
            .send(&SetEpsNetworkRegistrationStatus {
                n: RegistrationUrcConfig::EnabledWithLocation,
            })
            .await
        {
            warn!("Failed to enable +CEREG URCs: {:?}", e);
        }
        if let Err(e) = self
            .at
            .send(&SetTimeZoneReporting {
                mode: TimeZoneReportingMode::EnableTimeZone,
            })
            .await
        {
            warn!("Failed to enable time zone URCs: {:?}", e);
        }
        if let Err(e) = self.at.send(&SetPsmUrc { enabled: true }).await {
            warn!("Failed to enable PSM URCs: {:?}", e);
        }
    }
}
