//! Light control.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error};

use crate::config::LightConfig;
use crate::errors::Error;
use crate::message::Message;
use crate::pulse::{CancelToken, PulseHandle, PulsePhase};
use crate::reply::Reply;
use crate::runtime;
use crate::transport::Transport;
use crate::types::Colors;

type Result<T> = std::result::Result<T, Error>;

/// A connection to a single Wiz light.
///
/// The socket is opened by [`Light::connect`] and stays bound to that light
/// until the `Light` is dropped or [`closed`](Light::close).
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use wiz_pulse::{Colors, Light, LightConfig};
///
/// let light = Arc::new(Light::connect("192.168.1.100:38899".parse()?, LightConfig::default()).await?);
/// light.turn_on().await?;
///
/// let pulse = Arc::clone(&light).spawn_pulse(Colors::rgb(255, 100, 0));
/// // ... later
/// pulse.stop().await;
/// light.turn_off().await?;
/// ```
pub struct Light {
    addr: SocketAddr,
    config: LightConfig,
    transport: Transport,
}

impl Light {
    /// Default UDP port Wiz lights listen on.
    pub const PORT: u16 = 38899;

    /// Open a socket to the light at `addr`.
    pub async fn connect(addr: SocketAddr, config: LightConfig) -> Result<Self> {
        let label = config.label().map_or_else(|| addr.to_string(), String::from);
        let transport = Transport::connect(addr, config.timeout(), &label).await?;
        Ok(Light {
            addr,
            config,
            transport,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Send a raw command and return the decoded reply.
    pub async fn send_message(&self, msg: &Message) -> Result<Reply> {
        self.transport.send_message(msg).await
    }

    /// Any decodable reply counts as success; the reply's own flag is
    /// returned but not checked.
    pub async fn turn_on(&self) -> Result<Reply> {
        self.send_message(&Message::power(true))
            .await
            .map_err(|e| Error::command("turn on light", e))
    }

    pub async fn turn_off(&self) -> Result<Reply> {
        self.send_message(&Message::power(false))
            .await
            .map_err(|e| Error::command("turn off light", e))
    }

    /// Turn the light on with `colors` at the given dimming level.
    ///
    /// Zero channels and a zero dimming level are left out of the command.
    pub async fn set_color(&self, colors: &Colors, dimming: u8) -> Result<Reply> {
        self.send_message(&Message::color(colors, dimming))
            .await
            .map_err(|e| Error::command("set light color", e))
    }

    /// Blink between a low and a high brightness until `cancel` fires.
    ///
    /// Each round checks `cancel`, sends the current level and then holds
    /// it (10% for 200ms, 100% for 800ms). Failed sends are logged and the
    /// loop carries on with the next level.
    pub async fn pulse(&self, cancel: &CancelToken, colors: &Colors) {
        let mut phase = PulsePhase::Low;
        loop {
            if cancel.is_cancelled() {
                debug!("[{}] pulse cancelled", self.label());
                return;
            }

            if let Err(e) = self.set_color(colors, phase.dimming()).await {
                error!("[{}] {}", self.label(), e);
            }

            runtime::sleep(phase.hold()).await;
            phase = phase.next();
        }
    }

    /// Run [`pulse`](Light::pulse) as a background task.
    pub fn spawn_pulse(self: Arc<Self>, colors: Colors) -> PulseHandle {
        let token = CancelToken::new();
        let cancel = token.clone();
        let task = runtime::spawn(async move { self.pulse(&cancel, &colors).await });
        PulseHandle::new(token, task)
    }

    /// Release the socket.
    pub fn close(self) {
        debug!("[{}] closing connection", self.label());
    }

    fn label(&self) -> &str {
        self.transport.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use log::{Level, LevelFilter, Log, Metadata, Record};
    use serde_json::Value;
    use tokio::net::UdpSocket as FakeSocket;

    /// Keeps every log line so tests can look for what a light reported.
    struct CaptureLogger {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl Log for CaptureLogger {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.lines
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        lines: Mutex::new(Vec::new()),
    };

    fn capture_logs() {
        // Another test may have installed it already.
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Debug);
    }

    fn logged(level: Level, prefix: &str) -> Vec<String> {
        LOGGER
            .lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, line)| *l == level && line.starts_with(prefix))
            .map(|(_, line)| line.clone())
            .collect()
    }

    const OK_REPLY: &[u8] = br#"{"method":"setPilot","env":"test","result":{"success":true}}"#;

    /// A request seen by the fake device.
    #[derive(Debug, Clone)]
    struct Seen {
        at: Instant,
        raw: String,
        body: Value,
    }

    /// Fake bulb that records every request. The first `ignore` requests
    /// get no reply; later ones get `OK_REPLY`.
    struct FakeDevice {
        addr: SocketAddr,
        seen: Arc<Mutex<Vec<Seen>>>,
    }

    impl FakeDevice {
        async fn start(ignore: usize) -> Self {
            let socket = FakeSocket::bind("127.0.0.1:0").await.unwrap();
            let addr = socket.local_addr().unwrap();
            let seen = Arc::new(Mutex::new(Vec::new()));
            let log = Arc::clone(&seen);
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let mut count = 0;
                loop {
                    let Ok((n, from)) = socket.recv_from(&mut buf).await else {
                        return;
                    };
                    log.lock().unwrap().push(Seen {
                        at: Instant::now(),
                        raw: String::from_utf8(buf[..n].to_vec()).unwrap(),
                        body: serde_json::from_slice(&buf[..n]).unwrap(),
                    });
                    count += 1;
                    if count > ignore {
                        let _ = socket.send_to(OK_REPLY, from).await;
                    }
                }
            });
            FakeDevice { addr, seen }
        }

        fn seen(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }

        fn dimmings(&self) -> Vec<u64> {
            self.seen()
                .iter()
                .map(|s| s.body["params"]["dimming"].as_u64().unwrap())
                .collect()
        }
    }

    async fn light_for(device: &FakeDevice, timeout: Duration) -> Arc<Light> {
        let config = LightConfig::default()
            .with_timeout(timeout)
            .with_label("fake");
        Arc::new(Light::connect(device.addr, config).await.unwrap())
    }

    #[tokio::test]
    async fn test_turn_on_and_set_color() {
        let device = FakeDevice::start(0).await;
        let light = light_for(&device, Duration::from_secs(1)).await;

        let reply = light.turn_on().await.unwrap();
        assert!(reply.success());

        let colors = Colors {
            white: 0,
            red: 255,
            blue: 0,
            green: 100,
        };
        light.set_color(&colors, 50).await.unwrap();
        light.turn_off().await.unwrap();

        let seen = device.seen();
        assert_eq!(seen.len(), 3);
        assert_eq!(
            seen[0].raw,
            r#"{"method":"setPilot","params":{"state":true}}"#
        );
        assert_eq!(
            seen[1].raw,
            r#"{"method":"setPilot","params":{"state":true,"r":255,"g":100,"dimming":50}}"#
        );
        assert_eq!(
            seen[2].raw,
            r#"{"method":"setPilot","params":{"state":false}}"#
        );
    }

    #[tokio::test]
    async fn test_failures_name_the_operation() {
        let device = FakeDevice::start(usize::MAX).await;
        let light = light_for(&device, Duration::from_millis(50)).await;

        let err = light.turn_on().await.unwrap_err();
        assert!(err.to_string().starts_with("unable to turn on light: "));
        assert!(err.is_timeout());

        let err = light.turn_off().await.unwrap_err();
        assert!(err.to_string().starts_with("unable to turn off light: "));

        let err = light.set_color(&Colors::rgb(1, 2, 3), 40).await.unwrap_err();
        assert!(err.to_string().starts_with("unable to set light color: "));
        assert!(matches!(err.cause(), Error::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_unsuccessful_reply_is_still_accepted() {
        let socket = FakeSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (_, from) = socket.recv_from(&mut buf).await.unwrap();
            socket
                .send_to(br#"{"method":"setPilot","env":"test","result":{"success":false}}"#, from)
                .await
                .unwrap();
        });

        let light = Light::connect(addr, LightConfig::default()).await.unwrap();
        let reply = light.turn_on().await.unwrap();
        assert!(!reply.success());
    }

    #[tokio::test]
    async fn test_pulse_alternates_levels() {
        let device = FakeDevice::start(0).await;
        let light = light_for(&device, Duration::from_millis(500)).await;

        let pulse = Arc::clone(&light).spawn_pulse(Colors::rgb(255, 100, 0));
        // Sends land at ~0, 200, 1000, 1200, 2000 and 2200ms.
        tokio::time::sleep(Duration::from_millis(2400)).await;
        pulse.stop().await;

        let seen = device.seen();
        assert!(seen.len() >= 5, "{:?}", device.dimmings());
        assert_eq!(&device.dimmings()[..5], &[10, 100, 10, 100, 10]);

        for (i, pair) in seen[..5].windows(2).enumerate() {
            let gap = pair[1].at - pair[0].at;
            let hold = if i % 2 == 0 { 200 } else { 800 };
            assert!(
                gap >= Duration::from_millis(hold - 10) && gap < Duration::from_millis(hold + 150),
                "gap {i} was {gap:?}, expected ~{hold}ms"
            );
        }

        for s in &seen {
            assert_eq!(s.body["params"]["r"], 255);
            assert_eq!(s.body["params"]["g"], 100);
            assert_eq!(s.body["params"]["state"], true);
        }
    }

    #[tokio::test]
    async fn test_pulse_stops_after_cancel() {
        let device = FakeDevice::start(0).await;
        let light = light_for(&device, Duration::from_millis(500)).await;

        let pulse = Arc::clone(&light).spawn_pulse(Colors::rgb(0, 0, 255));
        tokio::time::sleep(Duration::from_millis(300)).await;

        let start = Instant::now();
        tokio::time::timeout(Duration::from_millis(1500), pulse.stop())
            .await
            .expect("pulse did not stop in time");
        assert!(start.elapsed() < Duration::from_millis(800 + 500 + 100));

        let sent = device.seen().len();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(device.seen().len(), sent);
    }

    #[tokio::test]
    async fn test_pulse_with_cancelled_token_sends_nothing() {
        let device = FakeDevice::start(0).await;
        let light = light_for(&device, Duration::from_millis(500)).await;

        let token = CancelToken::new();
        token.cancel();
        light.pulse(&token, &Colors::rgb(1, 1, 1)).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(device.seen().is_empty());
    }

    #[tokio::test]
    async fn test_pulse_logs_failure_and_keeps_going() {
        capture_logs();

        // First request goes unanswered and times out.
        let device = FakeDevice::start(1).await;
        let config = LightConfig::default()
            .with_timeout(Duration::from_millis(100))
            .with_label("flaky");
        let light = Arc::new(Light::connect(device.addr, config).await.unwrap());

        let pulse = Arc::clone(&light).spawn_pulse(Colors::rgb(255, 0, 0));
        // 100ms timeout + 200ms hold, then the second send.
        tokio::time::sleep(Duration::from_millis(600)).await;
        pulse.stop().await;

        let dims = device.dimmings();
        assert!(dims.len() >= 2, "{dims:?}");
        assert_eq!(&dims[..2], &[10, 100]);

        let errors = logged(Level::Error, "[flaky]");
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("unable to set light color: receive timed out"));
    }

    #[tokio::test]
    async fn test_pulse_cancel_through_handle_token() {
        let device = FakeDevice::start(0).await;
        let light = light_for(&device, Duration::from_millis(500)).await;

        let pulse = Arc::clone(&light).spawn_pulse(Colors::rgb(0, 255, 0));
        let token = pulse.token();
        tokio::time::sleep(Duration::from_millis(100)).await;

        pulse.cancel();
        assert!(token.is_cancelled());

        // Cancelled during the 200ms low hold, so the high level is never sent.
        pulse.stop().await;
        assert_eq!(device.dimmings(), vec![10]);
    }

    #[tokio::test]
    async fn test_connect_fails_for_broadcast_address() {
        let addr: SocketAddr = "255.255.255.255:38899".parse().unwrap();
        let err = match Light::connect(addr, LightConfig::default()).await {
            Ok(_) => panic!("connected to a broadcast address"),
            Err(e) => e,
        };
        assert!(matches!(err, Error::Connection { addr: a, .. } if a == addr), "{err}");
        assert!(err.to_string().starts_with("error dialing light at 255.255.255.255:38899"));
    }

    #[tokio::test]
    async fn test_connect_keeps_config() {
        let device = FakeDevice::start(0).await;
        let light = light_for(&device, Duration::from_millis(300)).await;
        assert_eq!(light.addr(), device.addr);
        assert_eq!(light.config().label(), Some("fake"));
        assert_eq!(light.transport().timeout(), Duration::from_millis(300));
        Arc::try_unwrap(light).ok().unwrap().close();
    }
}
