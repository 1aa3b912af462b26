//! Host-facing API.
//!
//! Every operation is one or a few AT round-trips; the serial link is
//! serialised by the shared client mutex, so calls from different tasks
//! interleave at command granularity. Two-stage exchanges (socket sends,
//! file uploads) hold the client lock across both stages so nothing can
//! wedge between the prompt and the payload.

use atat::asynch::AtatClient;
use core::fmt::Write as _;
use embassy_time::{with_timeout, Duration};
use heapless::String;
use no_std_net::IpAddr;

use crate::bands::LteBandMask;
use crate::command::control::types::{FlowControlMode, FlowControlValue};
use crate::command::control::{GetDataRate, GetFlowControl, SetDataRate, SetFlowControl};
use crate::command::device_lock::types::PinStatusCode;
use crate::command::device_lock::GetPinStatus;
use crate::command::file_system::responses::FileUploadResult;
use crate::command::file_system::{DeleteFile, GetFileCrc, StartFileUpload, WriteFileData};
use crate::command::general::responses::Hplmn;
use crate::command::general::{GetCcid, GetHplmn, GetImsi};
use crate::command::ip_transport_layer::responses::SocketReceiveStats;
use crate::command::ip_transport_layer::types::{
    AccessMode, SocketService, MAX_RECV_DATA_LEN, MAX_SEND_DATA_LEN,
};
use crate::command::ip_transport_layer::{
    CloseSocket, GetLastResultCode, OpenSocket, ReadSocketData, StartSendData, WriteData,
    QueryReceiveStats,
};
use crate::command::mobile_control::responses::{ModemTemperatures, PsmConfig, PsmSettings};
use crate::command::mobile_control::types::PowerDownMode;
use crate::command::mobile_control::{
    GetModemTemperatures, GetPsmConfig, GetPsmSettings, ModulePowerDown, SetPsmConfig,
    SetPsmSettings,
};
use crate::command::network_service::responses::{NetworkInfo, OperatorSelection};
use crate::command::network_service::types::{
    OperatorNameFormat, OperatorSelectionMode, SignalInfo,
};
use crate::command::network_service::{
    GetExtendedSignalQuality, GetNetworkInfo, GetOperatorSelection, GetSignalQuality,
    SetOperatorSelection,
};
use crate::command::psn::responses::{PdnConfig, PdnStatusList};
use crate::command::psn::types::{AuthenticationType, ContextId, ProtocolType};
use crate::command::psn::{
    ActivatePdn, DeactivatePdn, GetPdnConfig, GetPdnStatus, ResolveHostName, SetDnsServers,
    SetPdnConfig,
};
use crate::command::ssl::types::{SslContextId, SslOption};
use crate::command::ssl::{
    CloseSslSocket, OpenSslSocket, QuerySslReceiveStats, ReadSslData, SetSslOption,
    StartSendSslData,
};
use crate::command::system_features::responses::NetworkOperatorConfiguration;
use crate::command::system_features::types::{BandPriorityList, NetworkOperatorMode, ScanSequence};
use crate::command::system_features::{
    GetBandConfiguration, GetBandPriority, GetNetworkOperatorMode, GetScanSequence,
    SetBandConfiguration, SetBandPriority, SetNetworkOperatorMode, SetPsmEntry, SetScanSequence,
    SetUrcPort, GetUrcPort,
};
use crate::config::UrcPort;
use crate::dns::DnsQueryResult;
use crate::error::Error;
use crate::module_timing::dns_result_time;
use crate::socket::{Protocol, Socket, SocketHandle, SocketState};

use super::state::{self, EnablementOutcome, MAX_SOCKETS};
use super::AtHandle;

/// Baud rates the module UART accepts.
const SUPPORTED_BAUD_RATES: &[u32] = &[
    9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600,
];

/// Identity of the inserted SIM.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimCardInfo {
    pub iccid: String<22>,
    pub imsi: String<16>,
    pub hplmn: Hplmn,
}

pub struct Control<'a, AT: AtatClient> {
    ch: state::Runner<'a>,
    at: AtHandle<'a, AT>,
    psm_timer_radix: u32,
    max_file_size: usize,
}

impl<'a, AT: AtatClient> Control<'a, AT> {
    pub(crate) fn new(
        ch: state::Runner<'a>,
        at: AtHandle<'a, AT>,
        psm_timer_radix: u32,
        max_file_size: usize,
    ) -> Self {
        Self {
            ch,
            at,
            psm_timer_radix,
            max_file_size,
        }
    }

    /// After a flow-control rewrite the enablement sequence must be re-run
    /// before anything else touches the link.
    fn ensure_ready(&self) -> Result<(), Error> {
        match self.ch.enablement() {
            EnablementOutcome::SkippedAfterFlowControl => Err(Error::ModemNotReady),
            _ => Ok(()),
        }
    }

    // --- SIM and network status -------------------------------------------

    pub async fn get_sim_card_status(&mut self) -> Result<PinStatusCode, Error> {
        self.ensure_ready()?;
        Ok(self.at.send(&GetPinStatus).await?.code)
    }

    pub async fn get_sim_card_info(&mut self) -> Result<SimCardInfo, Error> {
        self.ensure_ready()?;
        let ccid = self.at.send(&GetCcid).await?;
        let imsi = self.at.send(&GetImsi).await?;
        let hplmn = self.at.send(&GetHplmn).await?;
        Ok(SimCardInfo {
            iccid: ccid.ccid,
            imsi: imsi.imsi,
            hplmn,
        })
    }

    pub async fn get_signal_info(&mut self) -> Result<SignalInfo, Error> {
        self.ensure_ready()?;
        let mut info = self.at.send(&GetExtendedSignalQuality).await?;
        // RxQual only exists on the legacy report.
        if let Ok(csq) = self.at.send(&GetSignalQuality).await {
            info.ber = csq.ber;
        }
        Ok(info)
    }

    pub async fn get_lte_network_info(&mut self) -> Result<NetworkInfo, Error> {
        self.ensure_ready()?;
        Ok(self.at.send(&GetNetworkInfo).await?)
    }

    pub async fn get_service_selection(&mut self) -> Result<OperatorSelection, Error> {
        self.ensure_ready()?;
        Ok(self.at.send(&GetOperatorSelection).await?)
    }

    /// Automatic selection, or manual camping on a numeric PLMN.
    pub async fn set_service_selection(&mut self, plmn: Option<&str>) -> Result<(), Error> {
        self.ensure_ready()?;
        if let Some(plmn) = plmn {
            if !(plmn.len() == 5 || plmn.len() == 6) || !plmn.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::BadParameter);
            }
        }
        self.at
            .send(&SetOperatorSelection {
                mode: if plmn.is_some() {
                    OperatorSelectionMode::Manual
                } else {
                    OperatorSelectionMode::Automatic
                },
                format: plmn.map(|_| OperatorNameFormat::Numeric),
                operator: plmn,
            })
            .await?;
        Ok(())
    }

    // --- PDN --------------------------------------------------------------

    pub async fn get_pdn_config(&mut self, context_id: ContextId) -> Result<PdnConfig, Error> {
        self.ensure_ready()?;
        if !context_id.is_valid() {
            return Err(Error::BadParameter);
        }
        let config = self.at.send(&GetPdnConfig { context_id }).await?;
        if config.auth.is_none() {
            // "PAP or CHAP" came back; surface it instead of coercing.
            return Err(Error::Unsupported);
        }
        Ok(config)
    }

    pub async fn set_pdn_config(
        &mut self,
        context_id: ContextId,
        context_type: ProtocolType,
        apn: &str,
        username: &str,
        password: &str,
        auth: AuthenticationType,
    ) -> Result<(), Error> {
        self.ensure_ready()?;
        if !context_id.is_valid() || apn.len() > 64 || username.len() > 32 || password.len() > 32 {
            return Err(Error::BadParameter);
        }
        self.at
            .send(&SetPdnConfig {
                context_id,
                context_type,
                apn,
                username,
                password,
                auth,
            })
            .await?;
        Ok(())
    }

    pub async fn activate_pdn(&mut self, context_id: ContextId) -> Result<(), Error> {
        self.ensure_ready()?;
        if !context_id.is_valid() {
            return Err(Error::BadParameter);
        }
        self.at.send(&ActivatePdn { context_id }).await?;
        Ok(())
    }

    pub async fn deactivate_pdn(&mut self, context_id: ContextId) -> Result<(), Error> {
        self.ensure_ready()?;
        if !context_id.is_valid() {
            return Err(Error::BadParameter);
        }
        self.at.send(&DeactivatePdn { context_id }).await?;
        Ok(())
    }

    pub async fn get_pdn_status(&mut self) -> Result<PdnStatusList, Error> {
        self.ensure_ready()?;
        Ok(self.at.send(&GetPdnStatus).await?)
    }

    pub async fn set_dns(
        &mut self,
        context_id: ContextId,
        primary: &str,
        secondary: Option<&str>,
    ) -> Result<(), Error> {
        self.ensure_ready()?;
        if !context_id.is_valid() || primary.is_empty() {
            return Err(Error::BadParameter);
        }
        self.at
            .send(&SetDnsServers {
                context_id,
                primary,
                secondary,
            })
            .await?;
        Ok(())
    }

    /// Resolve a host name over the given context.
    ///
    /// Serialised against concurrent resolutions; the result line arrives as
    /// a URC up to a minute after the command itself succeeds.
    pub async fn get_host_by_name(
        &mut self,
        context_id: ContextId,
        hostname: &str,
    ) -> Result<String<64>, Error> {
        self.ensure_ready()?;
        if !context_id.is_valid() || hostname.is_empty() || hostname.len() > 128 {
            return Err(Error::BadParameter);
        }

        let dns = self.ch.dns();
        let _guard = dns.lock.lock().await;
        dns.arm();

        if let Err(e) = self
            .at
            .send(&ResolveHostName {
                context_id,
                hostname,
            })
            .await
        {
            dns.disarm();
            return Err(e.into());
        }

        match with_timeout(dns_result_time(), dns.queue.receive()).await {
            Ok(settlement) => match settlement.result {
                DnsQueryResult::Success => Ok(settlement.address),
                DnsQueryResult::Failed | DnsQueryResult::Unknown => Err(Error::Unknown),
            },
            Err(_) => {
                dns.disarm();
                Err(Error::Timeout)
            }
        }
    }

    // --- Sockets ----------------------------------------------------------

    /// Register a socket record. The modem is not involved until
    /// [`Self::socket_connect`].
    pub fn socket_create(
        &mut self,
        context_id: ContextId,
        protocol: Protocol,
        remote_ip: IpAddr,
        remote_port: u16,
        local_port: u16,
    ) -> Result<SocketHandle, Error> {
        if !context_id.is_valid() {
            return Err(Error::BadParameter);
        }
        self.ch.with_sockets(|sockets| {
            let free = (0..MAX_SOCKETS as u8)
                .map(SocketHandle)
                .find(|h| sockets.get(*h).is_err())
                .ok_or(crate::socket::Error::SocketSetFull)?;
            sockets.add(Socket::new(
                free,
                context_id,
                protocol,
                remote_ip,
                remote_port,
                local_port,
            ))
        })
        .map_err(Error::from)
    }

    pub fn socket_state(&self, handle: SocketHandle) -> Result<SocketState, Error> {
        self.ch
            .with_sockets(|sockets| sockets.get(handle).map(|s| s.state()))
            .map_err(Error::from)
    }

    /// Issue the connect. The final state lands asynchronously via the
    /// `+QIOPEN`/`+QSSLOPEN` URC; poll [`Self::socket_state`].
    pub async fn socket_connect(&mut self, handle: SocketHandle) -> Result<(), Error> {
        self.ensure_ready()?;
        let (context_id, protocol, remote_ip, remote_port, local_port) = self
            .ch
            .with_sockets(|sockets| {
                let socket = sockets.get(handle)?;
                socket.connect_initiated()?;
                Ok::<_, crate::socket::Error>((
                    socket.context_id,
                    socket.protocol,
                    socket.remote_ip,
                    socket.remote_port,
                    socket.local_port,
                ))
            })
            .map_err(Error::from)?;

        let mut ip = String::<64>::new();
        write!(ip, "{}", remote_ip).ok();

        let result = match protocol {
            Protocol::Tcp | Protocol::UdpService => {
                self.at
                    .send(&OpenSocket {
                        context_id: context_id.0,
                        socket_id: handle.0,
                        service: match protocol {
                            Protocol::UdpService => SocketService::UdpService,
                            _ => SocketService::Tcp,
                        },
                        remote_addr: &ip,
                        remote_port,
                        local_port,
                        access: AccessMode::Buffer,
                    })
                    .await
            }
            Protocol::Tls(ssl_context) => {
                if local_port != 0 {
                    warn!("Local port is ignored for TLS sockets");
                }
                self.at
                    .send(&OpenSslSocket {
                        context_id: context_id.0,
                        ssl_context,
                        socket_id: handle.0,
                        remote_addr: &ip,
                        remote_port,
                        access: AccessMode::Buffer,
                    })
                    .await
            }
        };

        if let Err(e) = result {
            self.ch.with_sockets(|sockets| {
                if let Ok(socket) = sockets.get(handle) {
                    socket.connect_aborted();
                }
            });
            return Err(e.into());
        }
        Ok(())
    }

    /// Send up to [`MAX_SEND_DATA_LEN`] bytes; returns how many went out.
    pub async fn socket_send(&mut self, handle: SocketHandle, data: &[u8]) -> Result<usize, Error> {
        self.ensure_ready()?;
        let (protocol, send_timeout_ms, _) = self.data_transfer_params(handle)?;
        if data.is_empty() {
            return Ok(0);
        }
        let chunk = &data[..data.len().min(MAX_SEND_DATA_LEN)];

        // Both stages under one lock so nothing slips in after the prompt.
        let transfer = async {
            let mut client = self.at.0.lock().await;
            match protocol {
                Protocol::Tls(_) => {
                    client
                        .send(&StartSendSslData {
                            socket_id: handle.0,
                            length: chunk.len(),
                        })
                        .await?
                }
                _ => {
                    client
                        .send(&StartSendData {
                            socket_id: handle.0,
                            length: chunk.len(),
                        })
                        .await?
                }
            };
            client
                .send(&WriteData {
                    buf: atat::serde_at::ser::Bytes(chunk),
                })
                .await
        };
        with_timeout(Duration::from_millis(send_timeout_ms.into()), transfer)
            .await
            .map_err(|_| Error::Timeout)??;
        Ok(chunk.len())
    }

    /// Drain up to `buf.len()` buffered bytes; returns how many arrived.
    /// Zero means the modem buffer is currently empty.
    pub async fn socket_recv(
        &mut self,
        handle: SocketHandle,
        buf: &mut [u8],
    ) -> Result<usize, Error> {
        self.ensure_ready()?;
        let (protocol, _, recv_timeout_ms) = self.data_transfer_params(handle)?;
        let request = buf.len().min(MAX_RECV_DATA_LEN);
        if request == 0 {
            return Err(Error::BadParameter);
        }

        let transfer = async {
            match protocol {
                Protocol::Tls(_) => {
                    self.at
                        .send(&ReadSslData {
                            socket_id: handle.0,
                            length: request,
                        })
                        .await
                        .map(|r| r.data)
                }
                _ => {
                    self.at
                        .send(&ReadSocketData {
                            socket_id: handle.0,
                            length: request,
                        })
                        .await
                        .map(|r| r.data)
                }
            }
        };
        let data = with_timeout(Duration::from_millis(recv_timeout_ms.into()), transfer)
            .await
            .map_err(|_| Error::Timeout)??;
        // The modem never returns more than asked; anything else is a
        // framing failure upstream.
        let n = data.len().min(request);
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    pub async fn get_socket_receive_stats(
        &mut self,
        handle: SocketHandle,
    ) -> Result<SocketReceiveStats, Error> {
        self.ensure_ready()?;
        let (protocol, _, _) = self.data_transfer_params(handle)?;
        Ok(match protocol {
            Protocol::Tls(_) => {
                self.at
                    .send(&QuerySslReceiveStats {
                        socket_id: handle.0,
                    })
                    .await?
            }
            _ => {
                self.at
                    .send(&QueryReceiveStats {
                        socket_id: handle.0,
                    })
                    .await?
            }
        })
    }

    /// Close and unregister. With `remove_on_error` the record is dropped
    /// even when the close command fails; that is the only way to reclaim a
    /// handle the modem refuses to talk about.
    pub async fn socket_close(
        &mut self,
        handle: SocketHandle,
        remove_on_error: bool,
    ) -> Result<(), Error> {
        let (closeable, protocol) = self
            .ch
            .with_sockets(|sockets| {
                let socket = sockets.get(handle)?;
                Ok::<_, crate::socket::Error>((socket.closeable(), socket.protocol))
            })
            .map_err(Error::from)?;

        if !closeable {
            // Never reached the modem (or already closed); just unregister.
            self.ch.with_sockets(|sockets| sockets.remove(handle)).ok();
            return Ok(());
        }

        let result = match protocol {
            Protocol::Tls(_) => {
                self.at
                    .send(&CloseSslSocket {
                        socket_id: handle.0,
                    })
                    .await
            }
            _ => {
                self.at
                    .send(&CloseSocket {
                        socket_id: handle.0,
                    })
                    .await
            }
        };

        match result {
            Ok(_) => {
                self.ch.with_sockets(|sockets| {
                    if let Ok(socket) = sockets.get(handle) {
                        socket.closed();
                    }
                    sockets.remove(handle)
                })
                .ok();
                Ok(())
            }
            Err(e) => {
                if remove_on_error {
                    self.ch.with_sockets(|sockets| sockets.remove(handle)).ok();
                }
                Err(e.into())
            }
        }
    }

    pub async fn set_ssl_option(
        &mut self,
        context: SslContextId,
        option: SslOption<'_>,
    ) -> Result<(), Error> {
        self.ensure_ready()?;
        // String-valued options must fit the formatter budget.
        if let crate::command::ssl::types::SslOptionValue::Text(s) = option.value() {
            if s.len() > 96 {
                return Err(Error::BadParameter);
            }
        }
        self.at.send(&SetSslOption { context, option }).await?;
        Ok(())
    }

    pub async fn get_socket_last_result_code(&mut self) -> Result<u32, Error> {
        self.ensure_ready()?;
        Ok(self.at.send(&GetLastResultCode).await?.code)
    }

    /// Override the per-socket data-plane timeouts.
    pub fn socket_set_timeouts(
        &mut self,
        handle: SocketHandle,
        send_timeout_ms: u32,
        recv_timeout_ms: u32,
    ) -> Result<(), Error> {
        self.ch
            .with_sockets(|sockets| {
                let socket = sockets.get(handle)?;
                socket.send_timeout_ms = send_timeout_ms;
                socket.recv_timeout_ms = recv_timeout_ms;
                Ok(())
            })
            .map_err(Error::from)
    }

    fn data_transfer_params(&self, handle: SocketHandle) -> Result<(Protocol, u32, u32), Error> {
        self.ch
            .with_sockets(|sockets| {
                let socket = sockets.get(handle)?;
                socket.ensure_connected()?;
                Ok::<_, crate::socket::Error>((
                    socket.protocol,
                    socket.send_timeout_ms,
                    socket.recv_timeout_ms,
                ))
            })
            .map_err(Error::from)
    }

    // --- Radio tuning -----------------------------------------------------

    pub async fn get_rat_priority(&mut self) -> Result<ScanSequence, Error> {
        Ok(self.at.send(&GetScanSequence).await?.sequence)
    }

    pub async fn set_rat_priority(&mut self, sequence: ScanSequence) -> Result<(), Error> {
        self.at.send(&SetScanSequence { sequence }).await?;
        Ok(())
    }

    pub async fn get_lte_frequency_bands(&mut self) -> Result<LteBandMask, Error> {
        Ok(self.at.send(&GetBandConfiguration).await?.lte_mask)
    }

    /// Select LTE bands, silently clipped to what the radio supports. A
    /// request with no supported band at all is refused.
    pub async fn set_lte_frequency_bands(&mut self, mask: &LteBandMask) -> Result<(), Error> {
        let (filtered, cleared) = mask.filter_supported();
        if cleared {
            warn!("Dropping requested LTE bands outside the supported set");
        }
        if filtered.is_empty() {
            return Err(Error::BadParameter);
        }
        self.at
            .send(&SetBandConfiguration { lte_mask: filtered })
            .await?;
        Ok(())
    }

    pub async fn get_band_scan_priority(&mut self) -> Result<BandPriorityList, Error> {
        Ok(self.at.send(&GetBandPriority).await?.bands)
    }

    pub async fn set_band_scan_priority(&mut self, bands: BandPriorityList) -> Result<(), Error> {
        if bands.is_empty() {
            return Err(Error::BadParameter);
        }
        self.at.send(&SetBandPriority { bands }).await?;
        Ok(())
    }

    pub async fn get_network_operator_mode(
        &mut self,
    ) -> Result<NetworkOperatorConfiguration, Error> {
        Ok(self.at.send(&GetNetworkOperatorMode).await?)
    }

    pub async fn set_network_operator_mode(
        &mut self,
        mode: NetworkOperatorMode,
    ) -> Result<(), Error> {
        if mode.keyword().is_none() {
            return Err(Error::BadParameter);
        }
        self.at.send(&SetNetworkOperatorMode { mode }).await?;
        Ok(())
    }

    pub async fn get_urc_port(&mut self) -> Result<Option<UrcPort>, Error> {
        Ok(self.at.send(&GetUrcPort).await?.port)
    }

    pub async fn set_urc_port(&mut self, port: UrcPort) -> Result<(), Error> {
        self.at.send(&SetUrcPort { port }).await?;
        Ok(())
    }

    // --- Power saving -----------------------------------------------------

    pub async fn get_psm_settings(&mut self) -> Result<PsmSettings, Error> {
        Ok(self
            .at
            .send(&GetPsmSettings {
                timer_radix: self.psm_timer_radix,
            })
            .await?)
    }

    pub async fn set_psm_settings(&mut self, settings: PsmSettings) -> Result<(), Error> {
        if settings.periodic_tau > u8::MAX as u32 || settings.active_time > u8::MAX as u32 {
            return Err(Error::BadParameter);
        }
        self.at.send(&SetPsmSettings { settings }).await?;
        Ok(())
    }

    pub async fn get_psm_config_settings(&mut self) -> Result<PsmConfig, Error> {
        Ok(self.at.send(&GetPsmConfig).await?)
    }

    pub async fn set_psm_config_settings(&mut self, config: PsmConfig) -> Result<(), Error> {
        self.at
            .send(&SetPsmConfig {
                threshold: config.threshold,
                version: config.version,
            })
            .await?;
        Ok(())
    }

    /// Ask the module to drop into PSM as soon as the RRC connection
    /// releases, instead of waiting out the active timer.
    pub async fn set_psm_entry(&mut self, enabled: bool) -> Result<(), Error> {
        self.at.send(&SetPsmEntry { enabled }).await?;
        Ok(())
    }

    /// Graceful software power down. The prefix-less `POWERED DOWN` URC
    /// confirms the supply may be cut.
    pub async fn power_down(&mut self, mode: PowerDownMode) -> Result<(), Error> {
        self.at.send(&ModulePowerDown { mode }).await?;
        Ok(())
    }

    // --- File staging -----------------------------------------------------

    pub async fn upload_file(
        &mut self,
        name: &str,
        data: &[u8],
    ) -> Result<FileUploadResult, Error> {
        self.ensure_ready()?;
        if name.is_empty() || name.len() > 80 || data.is_empty() || data.len() > self.max_file_size
        {
            return Err(Error::BadParameter);
        }

        let mut client = self.at.0.lock().await;
        client
            .send(&StartFileUpload {
                name,
                size: data.len(),
            })
            .await
            .map_err(|e| match e {
                atat::Error::Timeout => Error::Timeout,
                _ => Error::FileUploadFailure,
            })?;
        client
            .send(&WriteFileData {
                buf: atat::serde_at::ser::Bytes(data),
            })
            .await
            .map_err(|e| match e {
                atat::Error::Timeout => Error::Timeout,
                _ => Error::FileUploadFailure,
            })
    }

    pub async fn delete_file(&mut self, name: &str) -> Result<(), Error> {
        self.ensure_ready()?;
        if name.is_empty() || name.len() > 80 {
            return Err(Error::BadParameter);
        }
        self.at.send(&DeleteFile { name }).await.map_err(|e| match e {
            atat::Error::Timeout => Error::Timeout,
            _ => Error::FileNotFound,
        })?;
        Ok(())
    }

    pub async fn get_file_crc32(&mut self, name: &str) -> Result<u32, Error> {
        self.ensure_ready()?;
        if name.is_empty() || name.len() > 80 {
            return Err(Error::BadParameter);
        }
        self.at
            .send(&GetFileCrc { name })
            .await
            .map(|crc| crc.crc32)
            .map_err(|e| match e {
                atat::Error::Timeout => Error::Timeout,
                _ => Error::FileNotFound,
            })
    }

    // --- UART -------------------------------------------------------------

    pub async fn get_module_flow_control(&mut self) -> Result<FlowControlMode, Error> {
        let report = self.at.send(&GetFlowControl).await?;
        Ok(FlowControlMode::from_pair(
            report.dce_by_dte,
            report.dte_by_dce,
        ))
    }

    pub async fn set_module_flow_control(&mut self, mode: FlowControlMode) -> Result<(), Error> {
        let (dce_by_dte, dte_by_dce) = match mode {
            FlowControlMode::None => (FlowControlValue::None, FlowControlValue::None),
            FlowControlMode::RtsOnly => (FlowControlValue::RtsCts, FlowControlValue::None),
            FlowControlMode::CtsOnly => (FlowControlValue::None, FlowControlValue::RtsCts),
            FlowControlMode::RtsCts => (FlowControlValue::RtsCts, FlowControlValue::RtsCts),
            FlowControlMode::Unknown => return Err(Error::BadParameter),
        };
        self.at
            .send(&SetFlowControl {
                dce_by_dte,
                dte_by_dce,
            })
            .await?;
        Ok(())
    }

    pub async fn get_module_baud_rate(&mut self) -> Result<u32, Error> {
        Ok(self.at.send(&GetDataRate).await?.rate)
    }

    /// The new rate applies right after `OK`; the caller owns reconfiguring
    /// the host UART.
    pub async fn set_module_baud_rate(&mut self, rate: u32) -> Result<(), Error> {
        if !SUPPORTED_BAUD_RATES.contains(&rate) {
            return Err(Error::BadParameter);
        }
        self.at.send(&SetDataRate { rate }).await?;
        Ok(())
    }

    // --- Telemetry and status ---------------------------------------------

    pub async fn get_modem_temperatures(&mut self) -> Result<ModemTemperatures, Error> {
        Ok(self.at.send(&GetModemTemperatures).await?)
    }

    /// Outcome of the last enablement run, for the caller that set
    /// `SKIP_SETUP_AFTER_FLOW_CONTROL_CHANGE`.
    pub fn enablement_outcome(&self) -> EnablementOutcome {
        self.ch.enablement()
    }

    pub fn is_registered(&self) -> bool {
        self.ch.is_registered(None)
    }

    pub async fn wait_registration_change(&mut self) -> bool {
        self.ch.wait_registration_change().await
    }

    /// Last signal report pushed via `+QIND: "csq"` URCs.
    pub fn last_signal(&self) -> SignalInfo {
        self.ch.last_signal()
    }

    /// Escape hatch: send an arbitrary command to the modem.
    ///
    /// This is useful for special configuration, but might break the
    /// driver's own bookkeeping if the settings interfere with it.
    pub async fn send<Cmd: atat::AtatCmd>(
        &mut self,
        cmd: &Cmd,
    ) -> Result<Cmd::Response, atat::Error> {
        self.at.send::<Cmd>(cmd).await
    }
}
