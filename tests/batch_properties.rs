//! Batch-level properties of the poller, driven through a scripted remote shell.

use std::{collections::HashMap, fmt::Display, sync::Arc, time::Duration};

use fleetpoll::application::Poller;
use fleetpoll::domain::{
    Address, CommandOutput, Credentials, ErrorKind, ExtractionPattern, Host, Job, RemoteShell,
    ShellChannel, ShellSession, Timeouts,
};
use proptest::prelude::*;
use secrecy::SecretString;

#[derive(Debug)]
struct ScriptError;
impl Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("unreachable")
    }
}
impl std::error::Error for ScriptError {}

/// Replies per address: `None` refuses the connection, `Some(text)` is the command output.
#[derive(Debug, Default)]
struct ScriptedShell {
    replies: HashMap<String, Option<String>>,
}

struct ScriptedSession(Option<String>);
struct ScriptedChannel(String);

#[async_trait::async_trait]
impl RemoteShell for ScriptedShell {
    type Error = ScriptError;
    type Session = ScriptedSession;

    async fn connect(
        &self,
        address: &Address,
        _credentials: &Credentials,
    ) -> Result<Self::Session, Self::Error> {
        // Spread completions so arrival order differs from submission order.
        let jitter = address.as_str().len() as u64 % 7;
        tokio::time::sleep(Duration::from_millis(jitter)).await;

        match self.replies.get(address.as_str()).cloned().flatten() {
            Some(text) => Ok(ScriptedSession(Some(text))),
            None => Err(ScriptError),
        }
    }
}

#[async_trait::async_trait]
impl ShellSession for ScriptedSession {
    type Error = ScriptError;
    type Channel = ScriptedChannel;

    async fn open_channel(&mut self) -> Result<Self::Channel, Self::Error> {
        self.0.take().map(ScriptedChannel).ok_or(ScriptError)
    }

    async fn close(self) {}
}

#[async_trait::async_trait]
impl ShellChannel for ScriptedChannel {
    type Error = ScriptError;

    async fn exec(&mut self, _command: &str) -> Result<CommandOutput, Self::Error> {
        Ok(CommandOutput {
            output: self.0.as_bytes().to_vec(),
            exit_status: Some(0),
        })
    }

    async fn close(self) {}
}

fn job() -> Arc<Job> {
    Arc::new(Job {
        credentials: Credentials::new("admin".to_owned(), SecretString::from("pw".to_owned()))
            .unwrap(),
        command: "show device info".to_owned(),
        pattern: ExtractionPattern::default(),
        timeouts: Timeouts::default(),
    })
}

#[derive(Debug, Clone)]
enum Reply {
    Refuse,
    Serial(u32),
    Garbage,
}

fn arb_reply() -> impl Strategy<Value = Reply> {
    prop_oneof![
        Just(Reply::Refuse),
        any::<u32>().prop_map(Reply::Serial),
        Just(Reply::Garbage),
    ]
}

fn scenario(replies: &[Reply]) -> (ScriptedShell, Vec<Host<usize>>) {
    let mut shell = ScriptedShell::default();
    let mut hosts = Vec::new();
    for (i, reply) in replies.iter().enumerate() {
        let address = format!("10.{}.{}.1", i / 256, i % 256);
        let script = match reply {
            Reply::Refuse => None,
            Reply::Serial(n) => Some(format!("Model: AP\r\nSerial Number : SN{n}\r\n")),
            Reply::Garbage => Some("% Unknown command\r\n".to_owned()),
        };
        shell.replies.insert(address.clone(), script);
        hosts.push(Host::new(Address::try_from(address).unwrap(), i));
    }
    (shell, hosts)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every submitted host yields exactly one result carrying its own context.
    #[test]
    fn prop_batch_is_complete(
        replies in prop::collection::vec(arb_reply(), 0..40),
        concurrency in 1usize..8,
    ) {
        let (shell, hosts) = scenario(&replies);
        let batch = runtime().block_on(Poller::new(shell, concurrency).poll(hosts, job()));

        prop_assert_eq!(batch.len(), replies.len());
        prop_assert!(batch.is_complete());

        for result in batch.results.iter() {
            prop_assert_eq!(result.index, result.context);
            prop_assert!(result.data().is_some() != result.error().is_some());

            match &replies[result.index] {
                Reply::Refuse => prop_assert_eq!(
                    result.error().map(|e| e.kind()),
                    Some(ErrorKind::Connection)
                ),
                Reply::Serial(n) => {
                    let expected = format!("SN{n}");
                    prop_assert_eq!(result.data(), Some(expected.as_str()));
                }
                Reply::Garbage => prop_assert_eq!(
                    result.error().map(|e| e.kind()),
                    Some(ErrorKind::PatternNotFound)
                ),
            }
        }
    }

    /// Re-running a batch against the same replies gives the same results.
    #[test]
    fn prop_reruns_are_identical(replies in prop::collection::vec(arb_reply(), 1..20)) {
        let rt = runtime();

        let (shell, hosts) = scenario(&replies);
        let first = rt.block_on(Poller::new(shell, 4).poll(hosts, job())).into_ordered();

        let (shell, hosts) = scenario(&replies);
        let second = rt.block_on(Poller::new(shell, 4).poll(hosts, job())).into_ordered();

        prop_assert_eq!(first, second);
    }
}

#[tokio::test]
async fn empty_host_list_completes_immediately() {
    let poller = Poller::new(ScriptedShell::default(), 4);

    let batch = tokio::time::timeout(
        Duration::from_secs(1),
        poller.poll(Vec::<Host<()>>::new(), job()),
    )
    .await
    .expect("empty batch must not hang");

    assert_eq!(batch.submitted, 0);
    assert!(batch.is_complete());
}
