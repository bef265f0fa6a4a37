//! Acquisition and release against a recording provisioner.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};
use test_helpers::RecordingProvisioner;
use tmp_postgres::{
    Config, Directory, Event, Logger, PartialPlan, PartialPostgresPlan, PartialProcessConfig,
    PartialSocket, Socket, StdStream, TmpPostgresError, acquire_resources_with,
    merge::{Combine, Last, Merge},
};

#[fixture]
fn provisioner() -> RecordingProvisioner {
    RecordingProvisioner::new().expect("create recording provisioner")
}

fn quiet() -> Config {
    Config {
        plan: PartialPlan {
            logger: Last::new(Logger::silent()),
            ..PartialPlan::default()
        },
        ..Config::default()
    }
}

#[rstest]
fn fixed_directory_and_ip_socket_need_no_cleanup(provisioner: RecordingProvisioner) {
    let config = Config::standard()
        .combine(quiet())
        .combine(Config::fixed_port(5555))
        .combine(Config::data_directory("/tmp/fixed-dir"))
        .combine(Config {
            socket: PartialSocket::ip("0.0.0.0"),
            ..Config::default()
        });

    let resources = acquire_resources_with(config, &provisioner).expect("acquire");
    let plan = resources.plan();
    assert_eq!(plan.postgres.process.arguments, ["-p", "5555", "-D", "/tmp/fixed-dir"]);
    assert!(
        plan.config.lines().any(|line| line == "listen_addresses = '0.0.0.0'"),
        "{}",
        plan.config
    );
    assert_eq!(plan.postgres.client.host, "0.0.0.0");
    assert_eq!(plan.postgres.client.port, 5555);
    assert_eq!(plan.data_directory, "/tmp/fixed-dir");
    assert!(plan.create.is_none());
    assert_eq!(
        plan.init.as_ref().map(|init| init.arguments.clone()),
        Some(vec!["--pgdata=/tmp/fixed-dir".to_owned(), "--no-sync".to_owned()])
    );
    assert_eq!(resources.socket(), &Socket::Ip("0.0.0.0".into()));

    resources.release_with(&provisioner).expect("release");
    assert_eq!(provisioner.port_queries(), 0);
    assert!(provisioner.created().is_empty());
    assert!(provisioner.removed().is_empty());
}

#[rstest]
fn defaults_materialise_temporaries_that_release_removes(provisioner: RecordingProvisioner) {
    let resources =
        acquire_resources_with(Config::standard().combine(quiet()), &provisioner).expect("acquire");
    assert_eq!(provisioner.port_queries(), 1);
    assert_eq!(provisioner.leftovers().expect("list root").len(), 2);

    let Socket::Unix(Directory::Temporary(socket_dir)) = resources.socket().clone() else {
        panic!("expected a temporary unix socket, got {:?}", resources.socket());
    };
    let Directory::Temporary(data_dir) = resources.directory().clone() else {
        panic!("expected a temporary data directory");
    };
    assert!(socket_dir.starts_with(provisioner.root()));
    assert_eq!(resources.plan().postgres.client.host, socket_dir.as_str());
    assert_eq!(resources.plan().data_directory, data_dir);
    assert!(
        resources
            .plan()
            .config
            .contains(&format!("unix_socket_directories = '{socket_dir}'"))
    );

    resources.release_with(&provisioner).expect("release");
    assert_eq!(provisioner.removed(), vec![socket_dir, data_dir]);
    assert!(provisioner.leftovers().expect("list root").is_empty());
}

#[rstest]
fn failed_data_directory_rolls_back_the_socket() {
    let provisioner = RecordingProvisioner::new()
        .expect("create recording provisioner")
        .failing_creation_of("tmp-postgres-data");

    let err = acquire_resources_with(Config::standard().combine(quiet()), &provisioner)
        .expect_err("data directory creation fails");
    assert!(matches!(err, TmpPostgresError::CreateDirectory { .. }), "{err:?}");

    let created = provisioner.created();
    assert_eq!(created.len(), 1);
    let socket_dir = &created[0];
    assert!(socket_dir.file_name().is_some_and(|name| name.starts_with("tmp-postgres-socket")));
    assert_eq!(provisioner.removals_of(socket_dir), 1);
    assert!(provisioner.leftovers().expect("list root").is_empty());
}

#[rstest]
fn incomplete_plan_reports_every_gap_and_rolls_back(provisioner: RecordingProvisioner) {
    let config = quiet().combine(Config {
        plan: PartialPlan {
            init: Merge::Replace(None),
            create: Merge::Splice(Some(PartialProcessConfig {
                stdout: Last::new(StdStream::Null),
                stderr: Last::new(StdStream::Null),
                ..PartialProcessConfig::default()
            })),
            postgres: PartialPostgresPlan {
                process: PartialProcessConfig {
                    stdin: Last::new(StdStream::Null),
                    stderr: Last::new(StdStream::Null),
                    ..PartialProcessConfig::default()
                },
                ..PartialPostgresPlan::default()
            },
            ..PartialPlan::default()
        },
        ..Config::default()
    });

    let err = acquire_resources_with(config, &provisioner).expect_err("plan is incomplete");
    let missing = err.missing_options().expect("incomplete plan");
    assert!(missing.contains("create.stdin"), "{missing}");
    assert!(missing.contains("postgres.process.stdout"), "{missing}");
    assert!(missing.contains("postgres.client.dbname"), "{missing}");
    assert_eq!(missing.len(), 3, "{missing}");

    let created = provisioner.created();
    assert_eq!(created.len(), 2);
    let reversed: Vec<_> = created.iter().rev().cloned().collect();
    assert_eq!(provisioner.removed(), reversed);
    assert!(provisioner.leftovers().expect("list root").is_empty());
}

#[rstest]
fn ip_overlay_beats_a_socket_directory(provisioner: RecordingProvisioner) {
    let config = Config::standard()
        .combine(quiet())
        .combine(Config {
            socket: PartialSocket::ip("10.1.2.3"),
            ..Config::default()
        })
        .combine(Config {
            socket: PartialSocket::Unix(tmp_postgres::PartialDirectory::Permanent(
                "/run/postgresql".into(),
            )),
            ..Config::default()
        });

    let resources = acquire_resources_with(config, &provisioner).expect("acquire");
    assert_eq!(resources.socket(), &Socket::Ip("10.1.2.3".into()));
    assert_eq!(provisioner.created().len(), 1, "only the data directory is created");
    resources.release_with(&provisioner).expect("release");
}

#[rstest]
fn releasing_a_directory_twice_is_harmless(provisioner: RecordingProvisioner) {
    let resources =
        acquire_resources_with(Config::standard().combine(quiet()), &provisioner).expect("acquire");
    let directory = resources.directory().clone();
    resources.release_with(&provisioner).expect("first release");

    directory.release(&provisioner).expect("second release");
    assert_eq!(provisioner.removals_of(directory.path()), 2);
}

#[rstest]
fn logger_sees_plan_and_release_events(provisioner: RecordingProvisioner) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let config = Config::standard().combine(Config {
        plan: PartialPlan {
            logger: Last::new(Logger::new(move |event: &Event| {
                sink.lock().expect("event sink").push(event.clone());
            })),
            ..PartialPlan::default()
        },
        ..Config::default()
    });

    let resources = acquire_resources_with(config, &provisioner).expect("acquire");
    resources.release_with(&provisioner).expect("release");

    let events = events.lock().expect("event sink");
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], Event::PlanReady { plan } if plan.contains("postgres")));
    assert_eq!(events[1], Event::ResourcesReleased);
}
