use std::env;
use std::ffi::CStr;
use std::fs::{self, Metadata};
use std::os::fd::AsRawFd;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Local};

use super::args::scan;
use super::{describe_io, human_size, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Debug, Clone, Copy, Default)]
struct ListOptions {
    show_all: bool,
    long_format: bool,
    human_readable: bool,
    reverse: bool,
    by_time: bool,
}

#[derive(Clone)]
pub struct LsCommand {
    resolver: PathResolver,
}

impl Default for LsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl LsCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }

    fn list_path(&self, dir: &Path, opts: ListOptions) -> Result<(), std::io::Error> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        if !opts.show_all {
            names.retain(|name| !name.starts_with('.'));
        }

        sort_entries(&mut names, dir, opts);

        if opts.long_format {
            self.print_long_format(&names, dir, opts.human_readable);
        } else {
            print!("{}", format_columns(&names, terminal_width()));
        }
        Ok(())
    }

    fn print_long_format(&self, names: &[String], dir: &Path, human_readable: bool) {
        let stats: Vec<(String, Option<Metadata>)> = names
            .iter()
            .map(|name| (name.clone(), fs::metadata(dir.join(name)).ok()))
            .collect();

        // st_blocks counts 512-byte units; total is shown in KiB.
        let total: u64 = stats
            .iter()
            .filter_map(|(_, meta)| meta.as_ref().map(|m| m.blocks() / 2))
            .sum();
        println!("total {}", total);

        for (name, meta) in &stats {
            match meta {
                Some(meta) => println!("{}", long_format_line(name, meta, human_readable)),
                // entry vanished between readdir and stat
                None => println!("?--------- ? ? ? ? ? {}", name),
            }
        }
    }
}

impl Command for LsCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &[])?;
        let opts = ListOptions {
            show_all: parsed.has('a'),
            long_format: parsed.has('l'),
            human_readable: parsed.has('h'),
            reverse: parsed.has('r'),
            by_time: parsed.has('t'),
        };

        let mut paths = parsed.into_operands();
        if paths.is_empty() {
            paths.push(".".to_string());
        }

        let count = paths.len();
        for (i, path) in paths.iter().enumerate() {
            if count > 1 {
                println!("{}:", path);
            }

            let resolved = self
                .resolver
                .resolve(path, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            if let Err(e) = self.list_path(&resolved, opts) {
                eprintln!("ls: cannot access '{}': {}", path, describe_io(&e));
            }

            if count > 1 && i + 1 < count {
                println!();
            }
        }
        Ok(())
    }
}

/// Lexicographic ascending by default; `-t` newest-first; `-r` inverts
/// whichever ordering is active, so `-tr` lists oldest-first.
fn sort_entries(names: &mut [String], dir: &Path, opts: ListOptions) {
    if opts.by_time {
        let mut keyed: Vec<(std::time::SystemTime, String)> = names
            .iter()
            .map(|name| {
                let mtime = fs::metadata(dir.join(name))
                    .and_then(|m| m.modified())
                    .unwrap_or(UNIX_EPOCH);
                (mtime, name.clone())
            })
            .collect();
        if opts.reverse {
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
        } else {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
        }
        for (slot, (_, name)) in names.iter_mut().zip(keyed) {
            *slot = name;
        }
    } else if opts.reverse {
        names.sort_by(|a, b| b.cmp(a));
    } else {
        names.sort();
    }
}

/// Packs names into as many fixed-width columns as fit; column width is
/// the longest name plus two.
fn format_columns(names: &[String], width: usize) -> String {
    let mut out = String::new();
    let max_len = names.iter().map(|n| n.len()).max().unwrap_or(0);
    if max_len == 0 {
        return out;
    }

    let col_width = max_len + 2;
    let cols = std::cmp::max(1, width / col_width);

    let mut last_row_filled = false;
    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!("{:<1$}", name, col_width));
        last_row_filled = (i + 1) % cols == 0;
        if last_row_filled {
            out.push('\n');
        }
    }
    if !last_row_filled {
        out.push('\n');
    }
    out
}

fn long_format_line(name: &str, meta: &Metadata, human_readable: bool) -> String {
    let perms = permissions_string(meta.mode(), meta.is_dir());
    let owner = user_name(meta.uid());
    let group = group_name(meta.gid());
    let size = if human_readable {
        human_size(meta.len())
    } else {
        meta.len().to_string()
    };
    let mtime: DateTime<Local> = meta.modified().unwrap_or(UNIX_EPOCH).into();

    format!(
        "{} {:>2} {} {} {:>8} {} {}",
        perms,
        meta.nlink(),
        owner,
        group,
        size,
        mtime.format("%b %d %H:%M"),
        name
    )
}

fn permissions_string(mode: u32, is_dir: bool) -> String {
    let mut out = String::with_capacity(10);
    out.push(if is_dir { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

fn user_name(uid: u32) -> String {
    unsafe {
        let mut pwd: libc::passwd = std::mem::zeroed();
        let mut buf = [0 as libc::c_char; 1024];
        let mut result: *mut libc::passwd = std::ptr::null_mut();
        if libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut result) == 0
            && !result.is_null()
        {
            return CStr::from_ptr(pwd.pw_name).to_string_lossy().into_owned();
        }
    }
    uid.to_string()
}

fn group_name(gid: u32) -> String {
    unsafe {
        let mut grp: libc::group = std::mem::zeroed();
        let mut buf = [0 as libc::c_char; 1024];
        let mut result: *mut libc::group = std::ptr::null_mut();
        if libc::getgrgid_r(gid, &mut grp, buf.as_mut_ptr(), buf.len(), &mut result) == 0
            && !result.is_null()
        {
            return CStr::from_ptr(grp.gr_name).to_string_lossy().into_owned();
        }
    }
    gid.to_string()
}

fn terminal_width() -> usize {
    if let Some(cols) = env::var("COLUMNS").ok().and_then(|c| c.parse().ok()) {
        return cols;
    }

    let fd = std::io::stdout().as_raw_fd();
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) } == 0 && ws.ws_col > 0 {
        ws.ws_col as usize
    } else {
        80
    }
}
