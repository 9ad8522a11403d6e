use std::fs;
use std::path::PathBuf;

use shrmpl_conf::{Config, ErrorKind, VarType};

const KV_SRV_CONF: &str = "\
# shrmpl-kv-srv
BIND_ADDR 127.0.0.1:7171
SERVER_NAME\tskv-srv
SEND_LOG
; send_actv is left off
LOG_LEVEL INFO
PEERS 10.0.0.2:7171, 10.0.0.3:7171,10.0.0.4:7171
MAX_CONN 1200
";

fn write_conf(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("shrmpl-conf-{}-{}.conf", name, std::process::id()));
    fs::write(&path, KV_SRV_CONF).unwrap();
    path
}

fn check(config: &Config) {
    assert_eq!(config.len(), 6);
    assert_eq!(config.get_string("bind_addr").unwrap(), "127.0.0.1:7171");
    assert_eq!(config.get_string("Server_Name").unwrap(), "skv-srv");
    assert!(config.get_bool("send_log").unwrap());
    assert!(!config.get_bool("send_actv").unwrap());
    assert_eq!(
        config.get_array("peers").unwrap(),
        ["10.0.0.2:7171", "10.0.0.3:7171", "10.0.0.4:7171"]
    );
    // 1200 in base 6
    assert_eq!(config.get_integer("max_conn").unwrap(), 288);

    let err = config.get_integer("bind_addr").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.key(), Some("bind_addr"));
    assert_eq!(err.expected(), Some(VarType::Integer));
}

#[test]
fn load_from_disk() {
    let path = write_conf("sync");
    let config = Config::load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    check(&config);
}

#[tokio::test]
async fn load_from_disk_async() {
    let path = write_conf("async");
    let config = Config::load_async(&path).await.unwrap();
    fs::remove_file(&path).unwrap();
    check(&config);
    assert_eq!(config, Config::parse(KV_SRV_CONF.as_bytes()).unwrap());
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("shrmpl-conf-does-not-exist.conf");
    assert_eq!(Config::load(&path).unwrap_err().kind(), ErrorKind::Io);
    assert_eq!(Config::load_async(&path).await.unwrap_err().kind(), ErrorKind::Io);
}
