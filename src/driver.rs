use core::fmt::{self, Write as _};

use strum::IntoEnumIterator;

use crate::{
    command::{CommandResult, InstantCommand},
    config::DriverConfig,
    decode::{AnalogMeasurements, OnOffStatus, SystemParameters, WarningReport},
    error::{Error, Result},
    fields::{MODEL_NAME, MODEL_NAME_WIDTH, min_info_len},
    frame::{self, Address, CommandId, HEADER_LEN, PROTOCOL_VERSION, REQUEST_CAPACITY, Response},
    response::validate,
    scaling::{BYPASS_HIGH_RATIO, BYPASS_LOW_VOLTS, Scaling},
    sink::TelemetrySink,
    transport::Transport,
    types::{Metric, PollState, StatusToken},
};

/// Manufacturer published at startup. The UPS does not report one.
pub const MANUFACTURER: &str = "EmersonNetworkPower";

/// Shortest vendor info response which still carries the whole model name.
const MIN_IDENT_LEN: usize = HEADER_LEN + min_info_len::VENDOR_INFO;

/// You can create a GxeUps using any [`Transport`], such as a
/// [`SerialTransport`](crate::transport::SerialTransport) wrapping a serial port.
///
/// `L` is the receive buffer size. The largest telemetry response needs 124 bytes.
///
/// Every method takes `&mut self`, so poll steps and commands can never overlap. A host which
/// issues commands from another thread should share the driver behind a single mutex.
pub struct GxeUps<T: Transport, const L: usize = 128> {
    transport: T,
    config: DriverConfig,
    state: PollState,
}

impl<T: Transport, const L: usize> GxeUps<T, L> {
    /// Create a new driver. The first poll step reads the system parameters.
    pub fn new(transport: T, config: DriverConfig) -> Self {
        Self {
            transport,
            config,
            state: PollState::SysParam,
        }
    }

    /// The frame the next poll step will request.
    pub fn poll_state(&self) -> PollState {
        self.state
    }

    pub fn address(&self) -> &Address {
        &self.config.address
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Identify the UPS and publish its manufacturer, model and address.
    ///
    /// A UPS which never answers, or answers with too little to hold the model name, is an
    /// error. The driver should not be started in that case.
    pub fn init_info(&mut self, sink: &mut impl TelemetrySink) -> Result<(), T::Error> {
        let mut buf = [0u8; L];
        let attempts = self.config.attempts;
        let got = retry(
            attempts,
            || -> Result<usize, T::Error> {
                let got = self.exchange(CommandId::GetVendorInfo, &[], &mut buf)?;
                // A corrupt reply fails the attempt so the next one gets a chance.
                if got >= MIN_IDENT_LEN && self.config.strict_checksum {
                    Response::new(&buf[..got.min(L)]).verify_checksums()?;
                }
                Ok(got)
            },
            |got| *got >= MIN_IDENT_LEN,
        )?;
        if got < MIN_IDENT_LEN {
            log::error!("Not enough identification data from UPS: {} bytes", got);
            return Err(Error::InsufficientInitialData { got });
        }

        let response = Response::new(&buf[..got.min(L)]);
        let model: heapless::String<{ MODEL_NAME_WIDTH / 2 }> =
            response.text(MODEL_NAME, MODEL_NAME_WIDTH)?;

        sink.set(Metric::Manufacturer.as_ref(), MANUFACTURER);
        sink.set(Metric::Model.as_ref(), &model);
        sink.set(Metric::Id.as_ref(), self.config.address.as_str());

        self.state = PollState::SysParam;
        Ok(())
    }

    /// Run one step of the poll cycle, publishing whatever it decodes.
    ///
    /// A failed step marks the sink stale and repeats on the next call. Returns the state the
    /// next step will poll.
    pub fn update_info(&mut self, sink: &mut impl TelemetrySink) -> PollState {
        log::debug!("Polling {} data", self.state);
        let outcome = match self.state {
            PollState::OnOff => self.poll_on_off(sink),
            PollState::Analog => self.poll_analog(sink),
            PollState::Warning => self.poll_warning(sink),
            PollState::SysParam => self.poll_sys_param(sink),
        };

        match outcome {
            Ok(next) => {
                self.state = next;
                sink.mark_ok();
            }
            Err(err) => {
                log::debug!("{} poll failed: {}", self.state, err);
                sink.mark_stale();
            }
        }
        self.state
    }

    /// The commands [`Self::instant_command`] accepts.
    pub fn supported_commands(&self) -> impl Iterator<Item = InstantCommand> {
        InstantCommand::iter()
    }

    /// Run the command called `name`, as the host reports instant command outcomes.
    pub fn instant_command(&mut self, name: &str) -> CommandResult {
        match self.execute(name) {
            Ok(_) => CommandResult::Handled,
            Err(Error::UnknownCommand) => {
                log::info!("instcmd: unknown command [{}]", name);
                CommandResult::Unknown
            }
            Err(err) => {
                log::warn!("instcmd: remote failed response, try again ({})", err);
                CommandResult::Failed
            }
        }
    }

    /// Look up and send the command called `name`. Names are case-insensitive.
    pub fn execute(&mut self, name: &str) -> Result<InstantCommand, T::Error> {
        let cmd = InstantCommand::from_name(name).ok_or(Error::UnknownCommand)?;
        self.send_command(cmd)?;
        Ok(cmd)
    }

    /// Send `cmd` until the UPS acknowledges it, up to the configured number of attempts.
    ///
    /// An acknowledged command schedules a full system parameter read next.
    ///
    /// __Note:__ A lost acknowledgement means the command is sent again, so the UPS may act on
    /// it twice.
    pub fn send_command(&mut self, cmd: InstantCommand) -> Result<(), T::Error> {
        let mut buf = [0u8; L];
        let attempts = self.config.attempts;
        retry(
            attempts,
            || {
                self.request(
                    CommandId::RemoteCommand,
                    cmd.payload(),
                    min_info_len::COMMAND,
                    &mut buf,
                )
                .map(|_| ())
            },
            |_| true,
        )?;
        self.state = PollState::SysParam;
        Ok(())
    }

    /// The UPS cannot be shut down over its serial port.
    pub fn shutdown(&mut self) {
        log::info!("GXE UPS can't fully shutdown, NOOP");
    }

    fn poll_on_off(&mut self, sink: &mut impl TelemetrySink) -> Result<PollState, T::Error> {
        let mut buf = [0u8; L];
        let response =
            self.request(CommandId::GetOnOffData, &[], min_info_len::ON_OFF, &mut buf)?;
        let decoded = OnOffStatus::decode(&response)?;

        // An unknown power path clears the status rather than keeping a stale one.
        let tokens = decoded.status.map(|status| status.tokens()).unwrap_or_default();
        replace_status(sink, tokens);

        if let Some(charger) = decoded.charger {
            sink.set(Metric::ChargerStatus.as_ref(), charger.as_ref());
        }
        if let Some(test) = decoded.battery_test {
            sink.set(Metric::TestResult.as_ref(), test.as_ref());
        }

        Ok(decoded.flag.redirect(PollState::Analog))
    }

    fn poll_analog(&mut self, sink: &mut impl TelemetrySink) -> Result<PollState, T::Error> {
        let mut buf = [0u8; L];
        let response =
            self.request(CommandId::GetAnalogData, &[], min_info_len::ANALOG, &mut buf)?;
        let analog = AnalogMeasurements::decode(&response)?;
        let mut next = analog.flag.redirect(PollState::Analog);

        // A status which disagrees with the input voltage means a warning was missed.
        let volts = analog.input_volts();
        if volts == 0 && sink.get_status(StatusToken::Online.as_ref()) {
            log::debug!("No input voltage while online, assuming on battery");
            replace_status(sink, &[StatusToken::OnBattery]);
            next = PollState::Warning;
        }
        if volts > 0 && sink.get_status(StatusToken::OnBattery.as_ref()) {
            log::debug!("Input voltage back while on battery, assuming online");
            replace_status(sink, &[StatusToken::Online]);
            next = PollState::Warning;
        }

        let centi = |raw| Scaling::CENTI.to_f32(raw);
        publish(sink, Metric::InputVoltage, format_args!("{:.2}", centi(analog.input_voltage)));
        publish(sink, Metric::OutputVoltage, format_args!("{:.2}", centi(analog.output_voltage)));
        publish(sink, Metric::OutputCurrent, format_args!("{:.2}", centi(analog.output_current)));
        publish(sink, Metric::BatteryVoltage, format_args!("{:.2}", centi(analog.battery_voltage)));
        publish(
            sink,
            Metric::OutputFrequency,
            format_args!("{:.2}", centi(analog.output_frequency)),
        );
        publish(
            sink,
            Metric::InputFrequency,
            format_args!("{:.2}", centi(analog.input_frequency)),
        );
        publish(
            sink,
            Metric::RealPower,
            format_args!("{}", Scaling::DECA.to_integer(analog.real_power)),
        );
        publish(
            sink,
            Metric::ApparentPower,
            format_args!("{}", Scaling::DECA.to_integer(analog.apparent_power)),
        );
        publish(
            sink,
            Metric::RuntimeLow,
            format_args!("{:.2}", Scaling::BACKUP_MINUTES.to_f32(analog.backup_time)),
        );

        Ok(next)
    }

    fn poll_warning(&mut self, sink: &mut impl TelemetrySink) -> Result<PollState, T::Error> {
        let mut buf = [0u8; L];
        let response =
            self.request(CommandId::GetWarningData, &[], min_info_len::WARNING, &mut buf)?;
        let report = WarningReport::decode(&response)?;

        sink.begin_alarms();
        for name in &report.active {
            sink.raise_alarm(name);
        }
        sink.commit_alarms();

        Ok(PollState::OnOff)
    }

    fn poll_sys_param(&mut self, sink: &mut impl TelemetrySink) -> Result<PollState, T::Error> {
        let mut buf = [0u8; L];
        let response =
            self.request(CommandId::GetSysParam, &[], min_info_len::SYS_PARAM, &mut buf)?;
        let params = SystemParameters::decode(&response)?;

        publish(sink, Metric::NominalVoltage, format_args!("{}", params.nominal_voltage));
        publish(sink, Metric::NominalFrequency, format_args!("{}", params.nominal_frequency));
        if params.bypass_high_enabled {
            let high = f32::from(params.nominal_voltage) * BYPASS_HIGH_RATIO;
            publish(sink, Metric::BypassHigh, format_args!("{:.6}", high));
        }
        if params.bypass_low_enabled {
            publish(sink, Metric::BypassLow, format_args!("{}", BYPASS_LOW_VOLTS));
        }
        publish(
            sink,
            Metric::TestInterval,
            format_args!("{}", Scaling::TEST_INTERVAL_SECS.to_integer(params.test_interval)),
        );

        Ok(PollState::Warning)
    }

    /// Exchange one frame and accept the response, which must carry at least `min_info` INFO
    /// characters.
    fn request<'b>(
        &mut self,
        cmd: CommandId,
        payload: &[u8],
        min_info: usize,
        buf: &'b mut [u8],
    ) -> Result<Response<'b>, T::Error> {
        let read = self.exchange(cmd, payload, buf);
        let response = validate(read, buf, HEADER_LEN + min_info)?;
        if self.config.strict_checksum {
            response.verify_checksums().inspect_err(|err| {
                log::error!("Rejected response: {}", err);
            })?;
        }
        Ok(response)
    }

    /// Send one frame and receive whatever comes back, returning the number of bytes read.
    fn exchange(
        &mut self,
        cmd: CommandId,
        payload: &[u8],
        buf: &mut [u8],
    ) -> Result<usize, T::Error> {
        self.transport.flush_input().map_err(Error::SerialError)?;

        let request: heapless::Vec<u8, REQUEST_CAPACITY> =
            frame::build(cmd, PROTOCOL_VERSION, &self.config.address, payload)?;
        log::trace!("send: {:02X?}", request.as_slice());

        match self.transport.send(&request) {
            Ok(0) => {
                log::warn!("send: timeout");
                return Err(Error::Timeout);
            }
            Ok(_) => {}
            Err(err) => {
                log::warn!("send: {:?}", err);
                return Err(Error::SerialError(err));
            }
        }

        match self.transport.receive(buf, self.config.timeout) {
            Ok(0) => {
                log::warn!("read: timeout");
                Err(Error::Timeout)
            }
            Ok(got) => {
                log::trace!("read: {:02X?}", &buf[..got.min(buf.len())]);
                Ok(got)
            }
            Err(err) => {
                log::warn!("read: {:?}", err);
                Err(Error::SerialError(err))
            }
        }
    }
}

/// Run `attempt` up to `attempts` times, stopping at the first outcome `accept` approves of.
///
/// The outcome of the last attempt is returned as is, accepted or not.
fn retry<R, E>(
    attempts: u8,
    mut attempt: impl FnMut() -> core::result::Result<R, E>,
    accept: impl Fn(&R) -> bool,
) -> core::result::Result<R, E> {
    for _ in 1..attempts.max(1) {
        match attempt() {
            Ok(outcome) if accept(&outcome) => return Ok(outcome),
            _ => {}
        }
    }
    attempt()
}

fn replace_status(sink: &mut impl TelemetrySink, tokens: &[StatusToken]) {
    sink.begin_status();
    for token in tokens {
        sink.set_status(token.as_ref());
    }
    sink.commit_status();
}

fn publish(sink: &mut impl TelemetrySink, metric: Metric, value: fmt::Arguments<'_>) {
    let mut text: heapless::String<32> = heapless::String::new();
    if text.write_fmt(value).is_err() {
        log::warn!("{} truncated", metric.as_ref());
    }
    sink.set(metric.as_ref(), &text);
}
