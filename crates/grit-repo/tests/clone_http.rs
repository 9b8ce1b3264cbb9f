//! End-to-end clone against a canned smart-HTTP server.
//!
//! A TcpListener on a loopback port serves exactly two exchanges: the
//! refs advertisement and the upload-pack response. The pack bytes are
//! hand-built so the test controls every object in the repository.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use grit_storage::{ObjectId, ObjectKind, ObjectStore};
use sha1::{Digest, Sha1};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use tempfile::TempDir;

// --- minimal HTTP plumbing ---

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    while find_header_end(&buf).is_none() {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "client closed mid-request");
        buf.extend_from_slice(&chunk[..n]);
    }

    let header_end = find_header_end(&buf).unwrap();
    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().unwrap())
        })
        .unwrap_or(0);

    while buf.len() < header_end + 4 + content_length {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "client closed mid-body");
        buf.extend_from_slice(&chunk[..n]);
    }
    buf
}

fn respond(stream: &mut TcpStream, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes()).unwrap();
    stream.write_all(body).unwrap();
    stream.flush().unwrap();
}

/// Serves one GET (refs advertisement) then one POST (upload-pack).
fn serve_clone(
    listener: TcpListener,
    advertisement: Vec<u8>,
    want: String,
    upload: Vec<u8>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        assert!(request.starts_with(b"GET /info/refs?service=git-upload-pack"));
        respond(
            &mut stream,
            "application/x-git-upload-pack-advertisement",
            &advertisement,
        );

        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        assert!(request.starts_with(b"POST /git-upload-pack"));
        let body_start = find_header_end(&request).unwrap() + 4;
        assert_eq!(
            &request[body_start..],
            format!("0032want {want}\n00000009done\n").as_bytes()
        );
        respond(&mut stream, "application/x-git-upload-pack-result", &upload);
    })
}

// --- pack and pkt-line builders ---

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn obj_header(code: u8, size: usize) -> Vec<u8> {
    let mut first = (code << 4) | ((size & 0x0F) as u8);
    let mut rest = size >> 4;
    if rest > 0 {
        first |= 0x80;
    }
    let mut out = vec![first];
    while rest > 0 {
        let mut byte = (rest & 0x7F) as u8;
        rest >>= 7;
        if rest > 0 {
            byte |= 0x80;
        }
        out.push(byte);
    }
    out
}

fn size_varint(mut value: usize) -> Vec<u8> {
    let mut out = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        *out.last_mut().unwrap() |= 0x80;
        out.push((value & 0x7F) as u8);
        value >>= 7;
    }
    out
}

fn seal_pack(count: u32, records: &[u8]) -> Vec<u8> {
    let mut pack = b"PACK".to_vec();
    pack.extend_from_slice(&2u32.to_be_bytes());
    pack.extend_from_slice(&count.to_be_bytes());
    pack.extend_from_slice(records);
    let digest = Sha1::digest(&pack);
    pack.extend_from_slice(&digest);
    pack
}

fn whole_object(code: u8, payload: &[u8]) -> Vec<u8> {
    let mut record = obj_header(code, payload.len());
    record.extend_from_slice(&deflate(payload));
    record
}

fn pkt(line: &str) -> Vec<u8> {
    format!("{:04x}{line}", line.len() + 4).into_bytes()
}

fn advertisement_for(head: &ObjectId, refname: &str) -> Vec<u8> {
    let mut advert = pkt("# service=git-upload-pack\n");
    advert.extend_from_slice(b"0000");
    advert.extend_from_slice(&pkt(&format!("{head} HEAD\0side-band-64k ofs-delta\n")));
    advert.extend_from_slice(&pkt(&format!("{head} {refname}\n")));
    advert.extend_from_slice(b"0000");
    advert
}

fn upload_response(pack: &[u8]) -> Vec<u8> {
    let mut upload = b"0008NAK\n".to_vec();
    upload.extend_from_slice(pack);
    upload
}

fn commit_payload(tree_id: &ObjectId) -> Vec<u8> {
    format!("tree {tree_id}\nauthor A <a@a> 0 +0000\ncommitter A <a@a> 0 +0000\n\ninitial\n")
        .into_bytes()
}

fn tree_entry(mode: u32, name: &str, id: &ObjectId) -> Vec<u8> {
    let mut entry = format!("{mode} {name}\0").into_bytes();
    entry.extend_from_slice(id.as_bytes());
    entry
}

// --- tests ---

#[test]
fn test_clone_materializes_working_tree() {
    let blob: &[u8] = b"hello from grit\n";
    let blob_id = ObjectId::for_object(ObjectKind::Blob, blob);

    let tree = tree_entry(100644, "file.txt", &blob_id);
    let tree_id = ObjectId::for_object(ObjectKind::Tree, &tree);

    let commit = commit_payload(&tree_id);
    let commit_id = ObjectId::for_object(ObjectKind::Commit, &commit);

    let mut records = whole_object(1, &commit);
    records.extend_from_slice(&whole_object(2, &tree));
    records.extend_from_slice(&whole_object(3, blob));
    let pack = seal_pack(3, &records);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = serve_clone(
        listener,
        advertisement_for(&commit_id, "refs/heads/main"),
        commit_id.to_hex(),
        upload_response(&pack),
    );

    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    grit_repo::clone(&format!("http://{addr}"), &out).unwrap();
    server.join().unwrap();

    assert_eq!(std::fs::read(out.join("file.txt")).unwrap(), blob);
    assert_eq!(
        std::fs::read_to_string(out.join(".git").join("HEAD")).unwrap(),
        "ref: refs/heads/main\n"
    );

    let store = ObjectStore::new(out.join(".git"));
    for id in [&commit_id, &tree_id, &blob_id] {
        assert!(store.exists(&id.to_hex()), "missing object {id}");
    }
}

#[test]
fn test_clone_resolves_ref_deltas() {
    let base: &[u8] = b"hello from grit\n";
    let base_id = ObjectId::for_object(ObjectKind::Blob, base);

    // target = copy of the whole base + appended literal
    let target: Vec<u8> = [base, b"and more\n"].concat();
    let target_id = ObjectId::for_object(ObjectKind::Blob, &target);
    let mut delta = size_varint(base.len());
    delta.extend_from_slice(&size_varint(target.len()));
    delta.extend_from_slice(&[0x90, base.len() as u8]);
    delta.push(9);
    delta.extend_from_slice(b"and more\n");

    let mut tree = tree_entry(100644, "extra.txt", &target_id);
    tree.extend_from_slice(&tree_entry(100644, "file.txt", &base_id));
    let tree_id = ObjectId::for_object(ObjectKind::Tree, &tree);

    let commit = commit_payload(&tree_id);
    let commit_id = ObjectId::for_object(ObjectKind::Commit, &commit);

    // the delta precedes its base in the pack
    let mut records = whole_object(1, &commit);
    records.extend_from_slice(&whole_object(2, &tree));
    records.extend_from_slice(&obj_header(7, delta.len()));
    records.extend_from_slice(base_id.as_bytes());
    records.extend_from_slice(&deflate(&delta));
    records.extend_from_slice(&whole_object(3, base));
    let pack = seal_pack(4, &records);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = serve_clone(
        listener,
        advertisement_for(&commit_id, "refs/heads/master"),
        commit_id.to_hex(),
        upload_response(&pack),
    );

    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    grit_repo::clone(&format!("http://{addr}"), &out).unwrap();
    server.join().unwrap();

    assert_eq!(std::fs::read(out.join("file.txt")).unwrap(), base);
    assert_eq!(std::fs::read(out.join("extra.txt")).unwrap(), target);
}
