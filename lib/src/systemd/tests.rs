use super::*;
use crate::runner::fake::FakeSystemctl;
use crate::wait::shutdown_channel;
use crate::{control, BoxError};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Hooks {
    events: Arc<Mutex<Vec<&'static str>>>,
    fail_start: bool,
}

impl Hooks {
    fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl Interface for Hooks {
    fn start(&self, _service: &dyn Service) -> Result<(), BoxError> {
        self.events.lock().unwrap().push("start");
        if self.fail_start {
            return Err("port already in use".into());
        }
        Ok(())
    }

    fn stop(&self, _service: &dyn Service) -> Result<(), BoxError> {
        self.events.lock().unwrap().push("stop");
        Ok(())
    }
}

struct Host {
    _dir: TempDir,
    layout: UnitLayout,
    systemctl: FakeSystemctl,
}

impl Host {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let system_dir = dir.path().join("etc/systemd/system");
        fs::create_dir_all(&system_dir).unwrap();
        let layout = UnitLayout {
            system_dir,
            home_dir: Some(dir.path().join("home/demo")),
        };
        let systemctl = FakeSystemctl::new(layout.clone());
        Self {
            _dir: dir,
            layout,
            systemctl,
        }
    }

    fn service(&self, config: ServiceConfig) -> SystemdService {
        self.service_with_hooks(config, Hooks::default())
    }

    fn service_with_hooks(&self, config: ServiceConfig, hooks: Hooks) -> SystemdService {
        SystemdService::new(hooks, config)
            .unwrap()
            .with_runner(self.systemctl.clone())
            .with_layout(self.layout.clone())
    }
}

fn demo_config() -> ServiceConfig {
    ServiceConfig {
        name: "demo".to_string(),
        description: "Demo service".to_string(),
        executable: Some(PathBuf::from("/usr/local/bin/demo")),
        ..Default::default()
    }
}

fn user_config() -> ServiceConfig {
    let mut config = demo_config();
    config.options.user_service = true;
    config
}

#[test]
fn test_unit_path_is_deterministic() {
    let layout = UnitLayout {
        system_dir: PathBuf::from("/etc/systemd/system"),
        home_dir: Some(PathBuf::from("/home/alice")),
    };
    let system = layout.unit_path("demo", false).unwrap();
    assert_eq!(system, PathBuf::from("/etc/systemd/system/demo.service"));
    assert_eq!(layout.unit_path("demo", false).unwrap(), system);

    let user = layout.unit_path("demo", true).unwrap();
    assert_eq!(
        user,
        PathBuf::from("/home/alice/.config/systemd/user/demo.service")
    );
    assert_eq!(layout.unit_path("demo", true).unwrap(), user);
}

#[test]
fn test_user_path_without_home() {
    let layout = UnitLayout {
        system_dir: PathBuf::from("/etc/systemd/system"),
        home_dir: None,
    };
    assert!(matches!(
        layout.unit_path("demo", true),
        Err(Error::HomeDirUnavailable)
    ));
}

#[test]
fn test_construction_performs_no_io() {
    let host = Host::new();
    let service = host.service(demo_config());
    assert!(host.systemctl.calls().is_empty());
    assert!(!service.unit_path().unwrap().exists());
}

#[test]
fn test_construction_rejects_bad_input() {
    let err = SystemdService::new(Hooks::default(), ServiceConfig::new("")).unwrap_err();
    assert!(matches!(err, Error::InvalidName(_)));

    let mut config = demo_config();
    config.options.unit_template = Some("{% if %}".to_string());
    let err = SystemdService::new(Hooks::default(), config).unwrap_err();
    assert!(matches!(err, Error::Template(_)));
}

#[test]
fn test_install_writes_enables_and_reloads() {
    let host = Host::new();
    let service = host.service(demo_config());

    service.install().unwrap();

    let path = host.layout.system_dir.join("demo.service");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("[Unit]\nDescription=Demo service\n"));
    assert!(contents.contains("ExecStart=/usr/local/bin/demo\n"));
    assert!(host.systemctl.is_enabled("demo.service"));
    assert_eq!(
        host.systemctl.calls(),
        vec![
            "systemctl --version",
            "systemctl enable demo.service",
            "systemctl daemon-reload",
        ]
    );
}

#[test]
fn test_install_twice_is_already_installed() {
    let host = Host::new();
    let service = host.service(demo_config());
    service.install().unwrap();

    let err = service.install().unwrap_err();
    match err {
        Error::AlreadyInstalled { path } => {
            assert_eq!(path, host.layout.system_dir.join("demo.service"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_install_leaves_unit_file_when_enable_fails() {
    let host = Host::new();
    host.systemctl
        .script("enable", 1, "Failed to enable unit: Access denied\n");
    let service = host.service(demo_config());

    let err = service.install().unwrap_err();
    match err {
        Error::Command {
            command, exit_code, ..
        } => {
            assert_eq!(command, "systemctl enable demo.service");
            assert_eq!(exit_code, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(service.unit_path().unwrap().exists());
    assert!(!host
        .systemctl
        .calls()
        .iter()
        .any(|c| c.contains("daemon-reload")));
}

#[test]
fn test_install_skips_log_files_on_old_systemd() {
    let host = Host::new();
    host.systemctl.set_version(Some(235));
    let mut config = demo_config();
    config.options.log_output = true;
    let service = host.service(config);

    service.install().unwrap();
    let contents = fs::read_to_string(service.unit_path().unwrap()).unwrap();
    assert!(!contents.contains("StandardOutput="));
}

#[test]
fn test_install_with_log_files() {
    let host = Host::new();
    let mut config = demo_config();
    config.options.log_output = true;
    config.options.log_directory = "/var/log/demo".to_string();
    let service = host.service(config);

    service.install().unwrap();
    let contents = fs::read_to_string(service.unit_path().unwrap()).unwrap();
    assert!(contents.contains("StandardOutput=file:/var/log/demo/demo.out\n"));
    assert!(contents.contains("StandardError=file:/var/log/demo/demo.err\n"));
}

#[test]
fn test_lifecycle() {
    let host = Host::new();
    let service = host.service(demo_config());

    service.install().unwrap();
    assert_eq!(service.status().unwrap(), Status::Stopped);

    service.start().unwrap();
    assert_eq!(service.status().unwrap(), Status::Running);

    service.restart().unwrap();
    service.restart().unwrap();
    assert_eq!(service.status().unwrap(), Status::Running);

    service.stop().unwrap();
    assert_eq!(service.status().unwrap(), Status::Stopped);
    service.stop().unwrap();
    assert_eq!(service.status().unwrap(), Status::Stopped);

    service.uninstall().unwrap();
    assert!(!service.unit_path().unwrap().exists());
    assert!(!host.systemctl.is_enabled("demo.service"));
    assert!(matches!(service.status(), Err(Error::NotInstalled)));
}

#[test]
fn test_uninstall_order() {
    let host = Host::new();
    let service = host.service(demo_config());
    service.install().unwrap();
    let before = host.systemctl.calls().len();

    service.uninstall().unwrap();
    assert_eq!(
        host.systemctl.calls()[before..],
        ["systemctl disable demo.service", "systemctl daemon-reload"]
    );
}

#[test]
fn test_uninstall_when_not_installed() {
    let host = Host::new();
    let service = host.service(demo_config());
    assert!(matches!(service.uninstall(), Err(Error::NotInstalled)));
    assert!(host.systemctl.calls().is_empty());
}

#[test]
fn test_status_checks_listing_only_when_inactive() {
    let host = Host::new();
    let service = host.service(demo_config());
    service.install().unwrap();
    service.start().unwrap();
    let before = host.systemctl.calls().len();

    assert_eq!(service.status().unwrap(), Status::Running);
    assert_eq!(
        host.systemctl.calls()[before..],
        ["systemctl is-active demo.service"]
    );

    service.stop().unwrap();
    let before = host.systemctl.calls().len();
    assert_eq!(service.status().unwrap(), Status::Stopped);
    assert_eq!(
        host.systemctl.calls()[before..],
        [
            "systemctl is-active demo.service",
            "systemctl list-unit-files -t service demo.service",
        ]
    );
}

#[test]
fn test_status_of_uninstalled_short_names() {
    let host = Host::new();
    for name in ["unit", "s", "demo"] {
        let service = host.service(ServiceConfig::new(name));
        assert!(
            matches!(service.status(), Err(Error::NotInstalled)),
            "{name}"
        );
    }
}

#[test]
fn test_status_failed_unit() {
    let host = Host::new();
    let service = host.service(demo_config());
    service.install().unwrap();
    host.systemctl.mark_failed("demo.service");

    let err = service.status().unwrap_err();
    assert!(matches!(err, Error::FailedState));
}

#[test]
fn test_status_activating_is_running() {
    let host = Host::new();
    host.systemctl.script("is-active", 3, "activating\n");
    let service = host.service(demo_config());
    assert_eq!(service.status().unwrap(), Status::Running);
}

#[test]
fn test_status_surfaces_spawn_failure() {
    let host = Host::new();
    host.systemctl.script_spawn_failure("is-active");
    let service = host.service(demo_config());
    assert!(matches!(service.status(), Err(Error::Spawn { .. })));
}

#[test]
fn test_start_failure_passes_through() {
    let host = Host::new();
    let service = host.service(demo_config());
    let err = service.start().unwrap_err();
    assert!(matches!(err, Error::Command { exit_code: 5, .. }));
}

#[test]
fn test_user_service_paths_and_flags() {
    let host = Host::new();
    let service = host.service(user_config());

    service.install().unwrap();
    let expected = host
        .layout
        .home_dir
        .as_ref()
        .unwrap()
        .join(".config/systemd/user/demo.service");
    assert_eq!(service.unit_path().unwrap(), expected);
    assert!(expected.exists());

    service.start().unwrap();
    assert_eq!(service.status().unwrap(), Status::Running);

    assert_eq!(
        host.systemctl.calls(),
        vec![
            "systemctl --version --user",
            "systemctl enable --user demo.service",
            "systemctl daemon-reload --user",
            "systemctl start --user demo.service",
            "systemctl is-active demo.service --user",
        ]
    );
}

#[test]
fn test_run_calls_hooks_around_wait() {
    let host = Host::new();
    let hooks = Hooks::default();
    let (handle, wait) = shutdown_channel();
    let service = host
        .service_with_hooks(demo_config(), hooks.clone())
        .with_run_wait(wait);

    handle.shutdown();
    service.run().unwrap();
    assert_eq!(hooks.events(), vec!["start", "stop"]);
}

#[test]
fn test_run_uses_custom_wait_once() {
    let host = Host::new();
    let hooks = Hooks::default();
    let waits = Arc::new(Mutex::new(0));
    let counter = waits.clone();
    let service = host
        .service_with_hooks(demo_config(), hooks.clone())
        .with_run_wait(move || *counter.lock().unwrap() += 1);

    service.run().unwrap();
    assert_eq!(*waits.lock().unwrap(), 1);
    assert_eq!(hooks.events(), vec!["start", "stop"]);
}

#[test]
fn test_run_start_failure_skips_stop() {
    let host = Host::new();
    let hooks = Hooks {
        fail_start: true,
        ..Default::default()
    };
    let service = host
        .service_with_hooks(demo_config(), hooks.clone())
        .with_run_wait(|| panic!("wait must not be reached"));

    let err = service.run().unwrap_err();
    assert!(matches!(err, Error::Hook(_)));
    assert!(err.to_string().contains("port already in use"));
    assert_eq!(hooks.events(), vec!["start"]);
}

#[test]
fn test_control_dispatch() {
    let host = Host::new();
    let service = host.service(demo_config());

    control(&service, "install").unwrap();
    control(&service, "start").unwrap();
    assert_eq!(service.status().unwrap(), Status::Running);
    control(&service, "stop").unwrap();
    control(&service, "uninstall").unwrap();

    let err = control(&service, "reload").unwrap_err();
    assert!(matches!(err, Error::UnknownAction { .. }));
    assert!(err.to_string().contains("start, stop, restart, install, uninstall"));
}

#[test]
fn test_display_name_and_platform() {
    let host = Host::new();
    let service = host.service(demo_config());
    assert_eq!(service.display_name(), "demo");
    assert_eq!(service.platform(), "linux-systemd");

    let mut config = demo_config();
    config.display_name = "Demo Daemon".to_string();
    assert_eq!(host.service(config).display_name(), "Demo Daemon");
}

#[test]
fn test_relative_executable_is_made_absolute() {
    let host = Host::new();
    let mut config = demo_config();
    config.executable = Some(PathBuf::from("bin/demo"));
    let service = host.service(config);
    let path = service.exec_path().unwrap();
    assert!(path.is_absolute());
    assert!(path.ends_with("bin/demo"));
}

#[test]
fn test_journal_args() {
    let host = Host::new();
    let service = host.service(demo_config());
    assert_eq!(
        service.journal_args(50, false),
        vec!["-u", "demo.service", "-n", "50", "--no-pager"]
    );

    let service = host.service(user_config());
    assert_eq!(
        service.journal_args(10, true),
        vec!["--user", "-u", "demo.service", "-n", "10", "-f", "--no-pager"]
    );
}
