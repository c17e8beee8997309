//! End-to-end run over a TOML inventory with a fake remote shell.

use std::{collections::HashMap, fmt::Display};

use fleetpoll::application::{App, Poller, Skipped, Status};
use fleetpoll::domain::{
    Address, CommandOutput, Credentials, ExtractionPattern, Job, RemoteShell, ShellChannel,
    ShellSession, Timeouts,
};
use fleetpoll::infrastructure::TomlInventory;
use secrecy::SecretString;

#[derive(Debug)]
struct Unreachable;
impl Display for Unreachable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("no route to host")
    }
}
impl std::error::Error for Unreachable {}

struct Devices(HashMap<&'static str, &'static str>);
struct Session(&'static str);
struct Channel(&'static str);

#[async_trait::async_trait]
impl RemoteShell for Devices {
    type Error = Unreachable;
    type Session = Session;

    async fn connect(
        &self,
        address: &Address,
        _credentials: &Credentials,
    ) -> Result<Self::Session, Self::Error> {
        self.0
            .get(address.as_str())
            .map(|x| Session(*x))
            .ok_or(Unreachable)
    }
}

#[async_trait::async_trait]
impl ShellSession for Session {
    type Error = Unreachable;
    type Channel = Channel;

    async fn open_channel(&mut self) -> Result<Self::Channel, Self::Error> {
        Ok(Channel(self.0))
    }

    async fn close(self) {}
}

#[async_trait::async_trait]
impl ShellChannel for Channel {
    type Error = Unreachable;

    async fn exec(&mut self, _command: &str) -> Result<CommandOutput, Self::Error> {
        Ok(CommandOutput {
            output: self.0.as_bytes().to_vec(),
            exit_status: Some(0),
        })
    }

    async fn close(self) {}
}

const INVENTORY: &str = r#"
site = "hq"

[[ap-floor1]]
address = "10.0.0.1"

[[ap-floor1]]
address = "10.0.0.2"
value = "PREVIOUS"

[[ap-floor1]]
address = "10.0.0.3"

[[ap-floor2]]
note = "not yet installed"

[[ap-floor3]]
address = "10.0.3.1"
"#;

fn job() -> Job {
    Job {
        credentials: Credentials::new("admin".to_owned(), SecretString::from("pw".to_owned()))
            .unwrap(),
        command: "show device info".to_owned(),
        pattern: ExtractionPattern::default(),
        timeouts: Timeouts::default(),
    }
}

#[tokio::test]
async fn run_writes_successes_and_reports_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.toml");
    std::fs::write(&path, INVENTORY).unwrap();
    let path = path.to_str().unwrap().to_owned();

    let devices = Devices(HashMap::from([
        ("10.0.0.1", "Serial Number : CNF1A"),
        ("10.0.0.3", "Model: 515"),
        ("10.0.3.1", "Serial Number: CNF3A"),
    ]));

    let inventory = TomlInventory::new(&path).await.unwrap();
    let app = App::new(inventory, Poller::new(devices, 8), job());
    let report = app.run().await.unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 2);

    let floor2 = report
        .groups
        .iter()
        .find(|x| x.group == "ap-floor2")
        .unwrap();
    assert_eq!(floor2.outcome.as_ref().unwrap_err(), &Skipped::NoHosts);
    // scalar keys are document metadata, not groups
    assert!(report.groups.iter().all(|x| x.group != "site"));

    let records = report.records();
    let statuses: Vec<_> = records
        .iter()
        .map(|x| (x.address.clone().unwrap_or_default(), x.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("10.0.0.1".to_owned(), Status::Ok),
            ("10.0.0.2".to_owned(), Status::Failed),
            ("10.0.0.3".to_owned(), Status::Failed),
            (String::new(), Status::Skipped),
            ("10.0.3.1".to_owned(), Status::Ok),
        ]
    );

    let saved: toml::value::Table =
        toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["ap-floor1"][0]["value"].as_str(), Some("CNF1A"));
    // failures leave the previous value in place
    assert_eq!(saved["ap-floor1"][1]["value"].as_str(), Some("PREVIOUS"));
    assert!(saved["ap-floor1"][2].get("value").is_none());
    assert_eq!(saved["ap-floor3"][0]["value"].as_str(), Some("CNF3A"));
    assert_eq!(saved["site"].as_str(), Some("hq"));
}
