//! End-to-end dispatch tests: raw arguments in, executor calls out.
//!
//! No privileges needed; the executor only records calls and the name-type
//! lives in a temporary directory.

#[path = "common/mod.rs"]
mod common;

use common::{Call, RecordingExecutor};
use vlink::{
    Dispatcher, Error, ErrorKind, FileStore, NameStyle, NameStyleStore, Outcome, QosDirection,
    VlanFlag,
};

fn state_file(dir: &tempfile::TempDir) -> FileStore {
    FileStore::new(dir.path().join("vconfig_name_type"))
}

async fn run(store: &FileStore, args: &[&str]) -> (Result<Outcome, Error>, Vec<Call>) {
    let executor = RecordingExecutor::default();
    let mut dispatcher = Dispatcher::new(&executor, store);
    let result = dispatcher.run(args).await;
    (result, executor.calls())
}

fn create(base: &str, name: &str, vlan_id: u16) -> Call {
    Call::Create {
        base: base.into(),
        name: name.into(),
        vlan_id,
    }
}

mod name_type {
    use super::*;

    #[tokio::test]
    async fn test_default_style_without_state() {
        let dir = tempfile::tempdir().unwrap();
        let (result, calls) = run(&state_file(&dir), &["add", "eth0", "5"]).await;
        result.unwrap();
        assert_eq!(calls, [create("eth0", "eth0.5", 5)]);
    }

    #[tokio::test]
    async fn test_persists_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let store = state_file(&dir);

        let (result, calls) = run(&store, &["set_name_type", "VLAN_PLUS_VID_NO_PAD"]).await;
        result.unwrap();
        assert!(calls.is_empty());

        // A fresh dispatcher, as a later process would build it.
        let (result, calls) = run(&state_file(&dir), &["add", "eth0", "5"]).await;
        result.unwrap();
        assert_eq!(calls, [create("eth0", "vlan5", 5)]);
    }

    #[tokio::test]
    async fn test_every_style() {
        let expected = [
            ("VLAN_PLUS_VID", "vlan0005"),
            ("VLAN_PLUS_VID_NO_PAD", "vlan5"),
            ("DEV_PLUS_VID", "eth0.0005"),
            ("DEV_PLUS_VID_NO_PAD", "eth0.5"),
        ];
        for (style, name) in expected {
            let dir = tempfile::tempdir().unwrap();
            let store = state_file(&dir);
            run(&store, &["set_name_type", style]).await.0.unwrap();
            let (result, calls) = run(&store, &["add", "eth0", "5"]).await;
            result.unwrap();
            assert_eq!(calls, [create("eth0", name, 5)], "{style}");
        }
    }

    #[tokio::test]
    async fn test_unknown_style_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = state_file(&dir);
        run(&store, &["set_name_type", "DEV_PLUS_VID"]).await.0.unwrap();

        let (result, _) = run(&store, &["set_name_type", "dev_plus_vid"]).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnknownNameType);
        assert_eq!(store.load(), NameStyle::DevPlusVid);
    }

    #[tokio::test]
    async fn test_concurrent_writers_last_rename_wins() {
        // Two invocations that both read the default, then both write. No
        // ordering is promised; whichever saved last is what the next
        // invocation sees, and the file is never torn.
        let dir = tempfile::tempdir().unwrap();
        let first_exec = RecordingExecutor::default();
        let second_exec = RecordingExecutor::default();
        let first_store = state_file(&dir);
        let second_store = state_file(&dir);
        let mut first = Dispatcher::new(&first_exec, &first_store);
        let mut second = Dispatcher::new(&second_exec, &second_store);

        first.run(&["set_name_type", "VLAN_PLUS_VID"]).await.unwrap();
        second.run(&["set_name_type", "DEV_PLUS_VID"]).await.unwrap();

        // The first dispatcher keeps what it saved itself.
        first.run(&["add", "eth0", "7"]).await.unwrap();
        assert_eq!(first_exec.calls(), [create("eth0", "vlan0007", 7)]);

        let (_, calls) = run(&state_file(&dir), &["add", "eth0", "7"]).await;
        assert_eq!(calls, [create("eth0", "eth0.0007", 7)]);
    }
}

mod flags {
    use super::*;

    #[tokio::test]
    async fn test_three_and_two_argument_forms() {
        let dir = tempfile::tempdir().unwrap();
        let store = state_file(&dir);
        let expected = Call::Flag {
            name: "eth0.10".into(),
            flag: VlanFlag::ReorderHdr,
            enabled: true,
        };

        let (result, calls) = run(&store, &["set_flag", "eth0.10", "1", "1"]).await;
        result.unwrap();
        assert_eq!(calls, [expected.clone()]);

        let (result, calls) = run(&store, &["set_flag", "eth0.10", "1"]).await;
        result.unwrap();
        assert_eq!(calls, [expected]);
    }

    #[tokio::test]
    async fn test_flag_number_five() {
        let dir = tempfile::tempdir().unwrap();
        let (result, calls) =
            run(&state_file(&dir), &["set_flag", "eth0.10", "5", "1"]).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidFlag);
        assert!(calls.is_empty());
    }
}

mod qos {
    use super::*;

    #[tokio::test]
    async fn test_egress_and_ingress() {
        let dir = tempfile::tempdir().unwrap();
        let store = state_file(&dir);

        let (result, calls) = run(&store, &["set_egress_map", "eth0.10", "5", "3"]).await;
        result.unwrap();
        assert_eq!(
            calls,
            [Call::Qos {
                name: "eth0.10".into(),
                direction: QosDirection::Egress,
                skb_priority: 5,
                vlan_pcp: 3,
            }]
        );

        let (result, calls) = run(&store, &["set_ingress_map", "eth0.10", "4", "2"]).await;
        result.unwrap();
        assert_eq!(
            calls,
            [Call::Qos {
                name: "eth0.10".into(),
                direction: QosDirection::Ingress,
                skb_priority: 4,
                vlan_pcp: 2,
            }]
        );
    }

    #[tokio::test]
    async fn test_pcp_eight() {
        let dir = tempfile::tempdir().unwrap();
        let (result, calls) =
            run(&state_file(&dir), &["set_egress_map", "eth0.10", "5", "8"]).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidQosValue);
        assert!(calls.is_empty());
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_unknown_command_never_dispatches() {
        let dir = tempfile::tempdir().unwrap();
        let (result, calls) = run(&state_file(&dir), &["foo", "eth0", "5"]).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCommand);
        assert_eq!(err.exit_code(), 2);
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn test_vlan_id_is_decimal() {
        let dir = tempfile::tempdir().unwrap();
        let store = state_file(&dir);
        let (_, with_zero) = run(&store, &["add", "eth0", "010"]).await;
        let (_, plain) = run(&store, &["add", "eth0", "10"]).await;
        assert_eq!(with_zero, plain);
        assert_eq!(plain, [create("eth0", "eth0.10", 10)]);

        for bad in ["0", "4095", "0x10", "-1", ""] {
            let (result, calls) = run(&store, &["add", "eth0", bad]).await;
            assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidVlanId, "{bad:?}");
            assert!(calls.is_empty());
        }
    }

    #[tokio::test]
    async fn test_executor_failure_text_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = state_file(&dir);
        let executor = RecordingExecutor::failing("Cannot find device \"eth9\"");
        let mut dispatcher = Dispatcher::new(&executor, &store);

        let err = dispatcher.run(&["add", "eth9", "5"]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutorFailure);
        assert_eq!(err.to_string(), "Cannot find device \"eth9\"");
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unwritable_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = FileStore::new(blocker.join("vconfig_name_type"));

        let (result, _) = run(&store, &["set_name_type", "VLAN_PLUS_VID"]).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StateStore);
        assert_eq!(err.exit_code(), 10);
    }
}
