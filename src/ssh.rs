use std::fs::File;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use ssh2::{OpenFlags, OpenType, Session, Sftp};

use crate::error::ConnectError;
use crate::keys::normalize_private_key;
use crate::model::{DirEntry, Profile};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REMOTE_FILE_MODE: i32 = 0o644;

/// File operations against the remote side of the workbench.
pub(crate) trait RemoteFs {
    fn list(&mut self, path: &str) -> Result<Vec<DirEntry>>;
    fn upload(&mut self, local: &Path, remote: &str) -> Result<u64>;
    fn download(&mut self, remote: &str, local: &Path) -> Result<u64>;
    fn delete(&mut self, remote: &str) -> Result<()>;
    /// Safe to call more than once.
    fn close(&mut self);
}

pub(crate) trait Connector {
    fn connect(&self, profile: &Profile) -> Result<Box<dyn RemoteFs>, ConnectError>;
}

#[derive(Debug, Default)]
pub(crate) struct SshConnector;

impl Connector for SshConnector {
    fn connect(&self, profile: &Profile) -> Result<Box<dyn RemoteFs>, ConnectError> {
        Ok(Box::new(TransportSession::connect(profile)?))
    }
}

/// One authenticated SSH connection with its SFTP channel.
pub(crate) struct TransportSession {
    session: Option<Session>,
    sftp: Option<Sftp>,
}

impl TransportSession {
    pub(crate) fn connect(profile: &Profile) -> Result<Self, ConnectError> {
        let port = profile.resolved_transfer_port();
        tracing::info!(host = %profile.host, port, user = %profile.username, "connecting");
        let tcp = dial(&profile.host, port).map_err(|err| ConnectError::Network(format!("{err:#}")))?;

        let mut session =
            Session::new().map_err(|err| ConnectError::Network(format!("create session: {err}")))?;
        session.set_timeout(CONNECT_TIMEOUT.as_millis() as u32);
        session.set_tcp_stream(tcp);
        // Host keys are accepted without verification.
        session
            .handshake()
            .map_err(|err| ConnectError::Network(format!("ssh handshake: {err}")))?;

        authenticate(&session, profile)?;
        if !session.authenticated() {
            return Err(ConnectError::Auth("server rejected credentials".to_string()));
        }

        let sftp = session
            .sftp()
            .map_err(|err| ConnectError::Network(format!("open sftp: {err}")))?;
        tracing::info!(host = %profile.host, "sftp session open");
        Ok(Self {
            session: Some(session),
            sftp: Some(sftp),
        })
    }

    fn sftp(&self) -> Result<&Sftp> {
        self.sftp
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("session is closed"))
    }
}

fn dial(host: &str, port: u16) -> Result<TcpStream> {
    let address = format!("{host}:{port}");
    let mut last_err = None;
    for addr in address.to_socket_addrs().context("resolve address")? {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => {
                stream.set_read_timeout(Some(CONNECT_TIMEOUT)).ok();
                stream.set_write_timeout(Some(CONNECT_TIMEOUT)).ok();
                return Ok(stream);
            }
            Err(err) => last_err = Some(err),
        }
    }
    let err = last_err.unwrap_or_else(|| io::Error::other("no address resolved"));
    Err(anyhow::anyhow!("connect tcp failed: {err}"))
}

fn authenticate(session: &Session, profile: &Profile) -> Result<(), ConnectError> {
    if let Some(raw_key) = profile.private_key() {
        let key = normalize_private_key(raw_key);
        return session
            .userauth_pubkey_memory(&profile.username, None, &key, None)
            .map_err(|err| ConnectError::Auth(format!("private key: {err}")));
    }
    if let Some(password) = profile.auth_password() {
        return session
            .userauth_password(&profile.username, password)
            .map_err(|err| ConnectError::Auth(format!("password: {err}")));
    }
    session
        .userauth_agent(&profile.username)
        .map_err(|err| ConnectError::Auth(format!("ssh agent: {err}")))
}

impl RemoteFs for TransportSession {
    fn list(&mut self, path: &str) -> Result<Vec<DirEntry>> {
        let sftp = self.sftp()?;
        let mut entries = Vec::new();
        for (child, stat) in sftp.readdir(Path::new(path)).context("read remote dir")? {
            let name = child
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| String::from("/"));
            if name == "." || name == ".." {
                continue;
            }
            let is_dir = stat.perm.unwrap_or(0) & 0o040000 != 0;
            entries.push(if is_dir {
                DirEntry::directory(name)
            } else {
                DirEntry::file(name)
            });
        }
        Ok(entries)
    }

    fn upload(&mut self, local: &Path, remote: &str) -> Result<u64> {
        let sftp = self.sftp()?;
        let mut source = File::open(local).context("open local file")?;
        let mut target = sftp
            .open_mode(
                Path::new(remote),
                OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
                REMOTE_FILE_MODE,
                OpenType::File,
            )
            .context("create remote file")?;
        let bytes = io::copy(&mut source, &mut target).context("write remote file")?;
        tracing::info!(local = %local.display(), remote, bytes, "uploaded");
        Ok(bytes)
    }

    fn download(&mut self, remote: &str, local: &Path) -> Result<u64> {
        let sftp = self.sftp()?;
        let mut source = sftp.open(Path::new(remote)).context("open remote file")?;
        let mut target = File::create(local).context("create local file")?;
        let bytes = io::copy(&mut source, &mut target).context("write local file")?;
        tracing::info!(remote, local = %local.display(), bytes, "downloaded");
        Ok(bytes)
    }

    fn delete(&mut self, remote: &str) -> Result<()> {
        self.sftp()?
            .unlink(Path::new(remote))
            .context("delete remote file")?;
        tracing::info!(remote, "deleted remote file");
        Ok(())
    }

    fn close(&mut self) {
        self.sftp.take();
        if let Some(session) = self.session.take() {
            if let Err(err) = session.disconnect(None, "closing", None) {
                tracing::debug!("disconnect failed: {err}");
            }
            tracing::info!("session closed");
        }
    }
}

impl Drop for TransportSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Shared by a mock connector and every session it hands out.
    #[derive(Debug, Default)]
    pub(crate) struct MockRemoteState {
        pub(crate) listings: HashMap<String, Vec<DirEntry>>,
        pub(crate) contents: HashMap<String, Vec<u8>>,
        pub(crate) list_errors: HashMap<String, String>,
        pub(crate) auth_failure: Option<String>,
        pub(crate) calls: Vec<String>,
        pub(crate) connects: usize,
        pub(crate) closes: usize,
    }

    impl MockRemoteState {
        pub(crate) fn transfer_calls(&self) -> Vec<&String> {
            self.calls
                .iter()
                .filter(|call| !call.starts_with("list "))
                .collect()
        }
    }

    fn split_remote(path: &str) -> (String, String) {
        match path.rsplit_once('/') {
            Some(("", name)) => ("/".to_string(), name.to_string()),
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => ("/".to_string(), path.to_string()),
        }
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct MockConnector {
        pub(crate) state: Arc<Mutex<MockRemoteState>>,
    }

    impl Connector for MockConnector {
        fn connect(&self, _profile: &Profile) -> Result<Box<dyn RemoteFs>, ConnectError> {
            let mut state = self.state.lock().unwrap();
            if let Some(reason) = state.auth_failure.clone() {
                return Err(ConnectError::Auth(reason));
            }
            state.connects += 1;
            Ok(Box::new(MockRemoteFs {
                state: Arc::clone(&self.state),
                open: true,
            }))
        }
    }

    pub(crate) struct MockRemoteFs {
        state: Arc<Mutex<MockRemoteState>>,
        open: bool,
    }

    impl RemoteFs for MockRemoteFs {
        fn list(&mut self, path: &str) -> Result<Vec<DirEntry>> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("list {path}"));
            if let Some(err) = state.list_errors.get(path) {
                return Err(anyhow::anyhow!(err.clone()));
            }
            Ok(state.listings.get(path).cloned().unwrap_or_default())
        }

        fn upload(&mut self, local: &Path, remote: &str) -> Result<u64> {
            let bytes = std::fs::read(local).context("open local file")?;
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("upload {remote}"));
            let (dir, name) = split_remote(remote);
            let listing = state.listings.entry(dir).or_default();
            if !listing.iter().any(|entry| entry.name == name) {
                listing.push(DirEntry::file(name));
            }
            let size = bytes.len() as u64;
            state.contents.insert(remote.to_string(), bytes);
            Ok(size)
        }

        fn download(&mut self, remote: &str, local: &Path) -> Result<u64> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("download {remote}"));
            let bytes = state
                .contents
                .get(remote)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no such file"))
                .context("open remote file")?;
            std::fs::write(local, &bytes).context("create local file")?;
            Ok(bytes.len() as u64)
        }

        fn delete(&mut self, remote: &str) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("delete {remote}"));
            let (dir, name) = split_remote(remote);
            if let Some(listing) = state.listings.get_mut(&dir) {
                listing.retain(|entry| entry.name != name);
            }
            state.contents.remove(remote);
            Ok(())
        }

        fn close(&mut self) {
            if self.open {
                self.open = false;
                self.state.lock().unwrap().closes += 1;
            }
        }
    }
}
