// End-to-end sessions against a server bound on the loopback interface

#[cfg(test)]
mod tests {
    use crate::core_network::network::serve;
    use crate::Config;
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::time::{sleep, timeout};

    struct TestServer {
        _dir: TempDir,
        root: PathBuf,
        addr: SocketAddr,
    }

    async fn start_server() -> TestServer {
        start_server_with_timeout(10).await
    }

    async fn start_server_with_timeout(accept_timeout: u64) -> TestServer {
        start_server_with(accept_timeout, 300).await
    }

    async fn start_server_with(accept_timeout: u64, idle_timeout: u64) -> TestServer {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();

        let mut config = Config::default();
        config.server.pasv_address = Some("127.0.0.1".to_string());
        config.server.data_accept_timeout = accept_timeout;
        config.server.data_idle_timeout = idle_timeout;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, Arc::new(config), root.clone()));

        TestServer { _dir: dir, root, addr }
    }

    struct Client {
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
    }

    impl Client {
        async fn connect(addr: SocketAddr) -> Self {
            let (read_half, writer) = TcpStream::connect(addr).await.unwrap().into_split();
            let mut client = Client {
                reader: BufReader::new(read_half),
                writer,
            };
            assert_eq!(client.reply().await, "220 Simple FTP Ready\r\n");
            client
        }

        async fn reply(&mut self) -> String {
            let mut line = String::new();
            self.reader.read_line(&mut line).await.unwrap();
            line
        }

        async fn send(&mut self, line: &str) {
            self.writer.write_all(line.as_bytes()).await.unwrap();
        }

        async fn command(&mut self, line: &str) -> String {
            self.send(line).await;
            self.reply().await
        }

        /// Sends PASV and connects to the advertised port.
        async fn open_data(&mut self) -> TcpStream {
            let port = pasv_port(&self.command("PASV\r\n").await);
            TcpStream::connect(("127.0.0.1", port)).await.unwrap()
        }
    }

    async fn wait_until(condition: impl Fn() -> bool) {
        for _ in 0..250 {
            if condition() {
                return;
            }
            sleep(Duration::from_millis(20)).await;
        }
        panic!("condition not reached in time");
    }

    fn pasv_port(reply: &str) -> u16 {
        assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
        assert!(reply.ends_with(").\r\n"), "{}", reply);
        let inner = &reply[reply.find('(').unwrap() + 1..reply.find(')').unwrap()];
        let fields: Vec<u16> = inner.split(',').map(|f| f.parse().unwrap()).collect();
        assert_eq!(&fields[..4], &[127, 0, 0, 1]);
        fields[4] * 256 + fields[5]
    }

    #[tokio::test]
    async fn test_fixed_replies() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        assert_eq!(client.command("USER anonymous\r\n").await, "331 Username OK, need password\r\n");
        assert_eq!(client.command("PASS secret\r\n").await, "230 User logged in\r\n");
        assert_eq!(client.command("SYST\r\n").await, "215 UNIX Type: L8\r\n");
        assert_eq!(client.command("PWD\r\n").await, "257 \"/\" is the current directory\r\n");
        assert_eq!(client.command("TYPE A\r\n").await, "200 Type set to I.\r\n");
        assert_eq!(client.command("CWD /tmp\r\n").await, "250 Directory change OK\r\n");
        assert_eq!(client.command("CDUP\r\n").await, "250 Directory change OK\r\n");
        assert_eq!(client.command("PWD\r\n").await, "257 \"/\" is the current directory\r\n");
    }

    #[tokio::test]
    async fn test_unknown_commands_get_502() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        assert_eq!(client.command("NOOP\r\n").await, "502 Command not implemented\r\n");
        assert_eq!(client.command("list\r\n").await, "502 Command not implemented\r\n");
        assert_eq!(client.command("RETR\r\n").await, "502 Command not implemented\r\n");
        assert_eq!(client.command("\r\n").await, "502 Command not implemented\r\n");
        assert_eq!(client.command("SYST\r\n").await, "215 UNIX Type: L8\r\n");
    }

    #[tokio::test]
    async fn test_quit_closes_the_session() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        assert_eq!(client.command("QUIT\r\n").await, "221 Goodbye\r\n");
        assert_eq!(client.reply().await, "");
    }

    #[tokio::test]
    async fn test_overlong_command_line() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        let long = format!("USER {}\r\n", "x".repeat(4000));
        assert_eq!(client.command(&long).await, "500 Command line too long.\r\n");
        assert_eq!(client.command("SYST\r\n").await, "215 UNIX Type: L8\r\n");
    }

    #[tokio::test]
    async fn test_transfers_require_pasv() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        assert_eq!(client.command("LIST\r\n").await, "425 Use PASV first.\r\n");
        assert_eq!(client.command("RETR a.txt\r\n").await, "425 Use PASV first.\r\n");
        assert_eq!(client.command("STOR a.txt\r\n").await, "425 Use PASV first.\r\n");
        assert!(!server.root.join("a.txt").exists());
    }

    #[tokio::test]
    async fn test_list_shows_regular_files_only() {
        let server = start_server().await;
        std::fs::write(server.root.join("a.txt"), b"hello").unwrap();
        std::fs::create_dir(server.root.join("sub")).unwrap();
        let mut client = Client::connect(server.addr).await;

        let mut data = client.open_data().await;
        assert_eq!(
            client.command("LIST\r\n").await,
            "150 Opening ASCII mode data connection for file list\r\n"
        );
        let mut listing = String::new();
        data.read_to_string(&mut listing).await.unwrap();
        assert_eq!(client.reply().await, "226 Transfer complete\r\n");

        assert_eq!(listing, "-rw-r--r-- 1 user group 5 Jul 19 12:00 a.txt\r\n");
    }

    #[tokio::test]
    async fn test_list_of_empty_root() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        let mut data = client.open_data().await;
        client.command("LIST\r\n").await;
        let mut listing = Vec::new();
        data.read_to_end(&mut listing).await.unwrap();
        assert!(listing.is_empty());
        assert_eq!(client.reply().await, "226 Transfer complete\r\n");
    }

    #[tokio::test]
    async fn test_retr_sends_exact_bytes() {
        let server = start_server().await;
        let content: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();
        std::fs::write(server.root.join("blob.bin"), &content).unwrap();
        let mut client = Client::connect(server.addr).await;

        let mut data = client.open_data().await;
        assert_eq!(client.command("RETR blob.bin\r\n").await, "150 Opening data connection\r\n");
        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        assert_eq!(client.reply().await, "226 Transfer complete\r\n");

        assert_eq!(received, content);
    }

    #[tokio::test]
    async fn test_retr_missing_file() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        let mut data = client.open_data().await;
        assert_eq!(client.command("RETR nope.txt\r\n").await, "150 Opening data connection\r\n");
        assert_eq!(client.reply().await, "550 File not found\r\n");

        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn test_retr_outside_root_is_refused() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        let _data = client.open_data().await;
        client.command("RETR ../../etc/passwd\r\n").await;
        assert_eq!(client.reply().await, "550 File not found\r\n");

        let _data = client.open_data().await;
        client.command("RETR /etc/passwd\r\n").await;
        assert_eq!(client.reply().await, "550 File not found\r\n");
    }

    #[tokio::test]
    async fn test_stor_then_retr_round_trip() {
        let server = start_server().await;
        let content = b"uploaded over the data channel\n".repeat(1000);
        let mut client = Client::connect(server.addr).await;

        let mut data = client.open_data().await;
        assert_eq!(client.command("STOR up.txt\r\n").await, "150 Opening data connection\r\n");
        data.write_all(&content).await.unwrap();
        drop(data);
        assert_eq!(client.reply().await, "226 Transfer complete\r\n");
        assert_eq!(std::fs::read(server.root.join("up.txt")).unwrap(), content);

        let mut data = client.open_data().await;
        client.command("RETR up.txt\r\n").await;
        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        assert_eq!(client.reply().await, "226 Transfer complete\r\n");
        assert_eq!(received, content);
    }

    #[tokio::test]
    async fn test_stor_replaces_existing_file() {
        let server = start_server().await;
        std::fs::write(server.root.join("f.txt"), b"old contents that are longer").unwrap();
        let mut client = Client::connect(server.addr).await;

        let mut data = client.open_data().await;
        client.command("STOR f.txt\r\n").await;
        data.write_all(b"new").await.unwrap();
        drop(data);
        assert_eq!(client.reply().await, "226 Transfer complete\r\n");
        assert_eq!(std::fs::read(server.root.join("f.txt")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_stor_outside_root_is_refused() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        let _data = client.open_data().await;
        assert_eq!(client.command("STOR ../escape.txt\r\n").await, "150 Opening data connection\r\n");
        assert_eq!(client.reply().await, "550 Could not create file\r\n");
        assert!(!server.root.parent().unwrap().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_listener_is_single_use() {
        let server = start_server().await;
        let mut client = Client::connect(server.addr).await;

        let mut data = client.open_data().await;
        client.command("LIST\r\n").await;
        let mut listing = Vec::new();
        data.read_to_end(&mut listing).await.unwrap();
        assert_eq!(client.reply().await, "226 Transfer complete\r\n");

        assert_eq!(client.command("LIST\r\n").await, "425 Use PASV first.\r\n");
    }

    #[tokio::test]
    async fn test_second_pasv_replaces_first() {
        let server = start_server().await;
        std::fs::write(server.root.join("a.txt"), b"abc").unwrap();
        let mut client = Client::connect(server.addr).await;

        let first = pasv_port(&client.command("PASV\r\n").await);
        let mut data = client.open_data().await;
        let second = data.peer_addr().unwrap().port();
        if first != second {
            assert!(TcpStream::connect(("127.0.0.1", first)).await.is_err());
        }

        client.command("RETR a.txt\r\n").await;
        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        assert_eq!(client.reply().await, "226 Transfer complete\r\n");
        assert_eq!(received, b"abc");
    }

    #[tokio::test]
    async fn test_accept_timeout_keeps_session_alive() {
        let server = start_server_with_timeout(1).await;
        let mut client = Client::connect(server.addr).await;

        pasv_port(&client.command("PASV\r\n").await);
        assert_eq!(
            client.command("LIST\r\n").await,
            "150 Opening ASCII mode data connection for file list\r\n"
        );
        assert_eq!(client.reply().await, "425 Can't open data connection\r\n");

        assert_eq!(client.command("SYST\r\n").await, "215 UNIX Type: L8\r\n");
        assert_eq!(client.command("LIST\r\n").await, "425 Use PASV first.\r\n");
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let server = start_server().await;
        std::fs::write(server.root.join("a.txt"), b"shared").unwrap();
        let mut first = Client::connect(server.addr).await;
        let mut second = Client::connect(server.addr).await;

        let _first_data = first.open_data().await;
        assert_eq!(second.command("RETR a.txt\r\n").await, "425 Use PASV first.\r\n");

        let mut data = second.open_data().await;
        second.command("RETR a.txt\r\n").await;
        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        assert_eq!(second.reply().await, "226 Transfer complete\r\n");
        assert_eq!(received, b"shared");
    }

    #[tokio::test]
    async fn test_stalled_upload_does_not_hang_other_sessions() {
        // Lock waits give up after 1s; the stalled upload itself after 3s.
        let server = start_server_with(1, 3).await;
        let target = server.root.join("f.txt");
        std::fs::write(&target, b"previous contents").unwrap();

        let mut uploader = Client::connect(server.addr).await;
        let _upload_data = uploader.open_data().await;
        assert_eq!(uploader.command("STOR f.txt\r\n").await, "150 Opening data connection\r\n");
        // Truncation happens under the upload's exclusive lock.
        wait_until(|| std::fs::metadata(&target).map(|m| m.len() == 0).unwrap_or(false)).await;

        let mut downloader = Client::connect(server.addr).await;
        let _download_data = downloader.open_data().await;
        assert_eq!(downloader.command("RETR f.txt\r\n").await, "150 Opening data connection\r\n");
        let reply = timeout(Duration::from_secs(5), downloader.reply())
            .await
            .expect("RETR on a busy file got no reply");
        assert_eq!(reply, "450 Requested file action not taken.\r\n");
        assert_eq!(downloader.command("SYST\r\n").await, "215 UNIX Type: L8\r\n");

        let reply = timeout(Duration::from_secs(10), uploader.reply())
            .await
            .expect("stalled STOR was never abandoned");
        assert_eq!(reply, "426 Connection closed; transfer aborted.\r\n");

        // The lock is free again once the upload gave up.
        let mut data = downloader.open_data().await;
        downloader.command("RETR f.txt\r\n").await;
        let mut received = Vec::new();
        data.read_to_end(&mut received).await.unwrap();
        assert_eq!(downloader.reply().await, "226 Transfer complete\r\n");
        assert!(received.is_empty());
    }
}
