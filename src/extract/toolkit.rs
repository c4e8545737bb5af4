use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use log::{debug, info, warn};
use tokio::io;
use tokio::join;
use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};
use tokio::time::timeout;
use crate::config::{date, Config, Location};
use crate::error::Error;
use super::{parse, FlowRecord};

pub const TCP: u8 = 6;

#[derive(Clone, Debug)]
pub struct Tool {
    pub program: PathBuf,
    pub prefix:  Vec<String>,
}

pub struct Toolkit {
    filter: Tool,
    count:  Tool,
    rt:     Runtime,
}

impl Tool {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            prefix:  Vec::new(),
        }
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix);
        cmd.args(args);
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }
}

impl Toolkit {
    pub fn new(filter: Tool, count: Tool) -> Result<Self, Error> {
        let rt = Builder::new_current_thread().enable_all().build().map_err(|e| {
            Error::Extraction(format!("runtime: {}", e))
        })?;
        Ok(Self { filter, count, rt })
    }

    pub fn silk() -> Result<Self, Error> {
        Self::new(Tool::new("rwfilter"), Tool::new("rwcount"))
    }

    pub fn extract(&self, cfg: &Config, loc: &Location) -> Result<Vec<FlowRecord>, Error> {
        info!("fetching TCP traffic from {} to {}", cfg.start_date, cfg.end_date);

        // the timer must be created inside the runtime
        let output = self.rt.block_on(async {
            timeout(cfg.timeout, self.execute(cfg, loc)).await
        });

        match output {
            Ok(Ok(output)) => parse(&output, cfg.bin_size),
            Ok(Err(e))     => Err(e),
            Err(_)         => Err(Error::ExtractionTimeout(cfg.timeout)),
        }
    }

    async fn execute(&self, cfg: &Config, loc: &Location) -> Result<String, Error> {
        let filter_args = filter_args(cfg, loc);
        let count_args  = count_args(cfg);

        debug!("executing {} {}", self.filter.name(), filter_args.join(" "));
        debug!("piping to {} {}", self.count.name(), count_args.join(" "));

        let mut filter = self.filter.command(&filter_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| failed(&self.filter, e))?;

        let mut count = self.count.command(&count_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| failed(&self.count, e))?;

        let mut src = filter.stdout.take().ok_or_else(|| missing(&self.filter, "stdout"))?;
        let mut dst = count.stdin.take().ok_or_else(|| missing(&self.count, "stdin"))?;

        let pipe = async move {
            let copied = io::copy(&mut src, &mut dst).await;
            drop(dst);
            copied
        };

        let (copied, filtered, counted) = join!(
            pipe,
            filter.wait_with_output(),
            count.wait_with_output()
        );

        check(&self.filter, filtered.map_err(|e| failed(&self.filter, e))?)?;
        let counted = check(&self.count, counted.map_err(|e| failed(&self.count, e))?)?;

        match copied {
            Ok(n)                                       => debug!("piped {} bytes", n),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => debug!("{} closed its input", self.count.name()),
            Err(e)                                      => return Err(Error::Extraction(format!("pipe: {}", e))),
        }

        String::from_utf8(counted.stdout).map_err(|e| {
            Error::Extraction(format!("{} output: {}", self.count.name(), e))
        })
    }
}

pub fn filter_args(cfg: &Config, loc: &Location) -> Vec<String> {
    vec![
        format!("--data-rootdir={}",     loc.data_root.display()),
        format!("--site-config-file={}", loc.site_config.display()),
        format!("--start-date={}",       date::silk_hour(&cfg.start_date)),
        format!("--end-date={}",         date::silk_hour(&cfg.end_date)),
        format!("--sensor={}",           cfg.sensor),
        format!("--type={}",             cfg.flow_type),
        format!("--proto={}",            TCP),
        "--pass=stdout".to_owned(),
    ]
}

pub fn count_args(cfg: &Config) -> Vec<String> {
    vec![
        format!("--bin-size={}",   cfg.bin_size),
        format!("--start-time={}", date::silk_time(&cfg.start_date)),
        format!("--end-time={}",   date::silk_time(&cfg.end_date)),
        "--timestamp-format=epoch".to_owned(),
        "--delimited=|".to_owned(),
        "--no-titles".to_owned(),
    ]
}

fn check(tool: &Tool, output: Output) -> Result<Output, Error> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();

    if !output.status.success() {
        let msg = format!("{} failed with {}: {}", tool.name(), output.status, stderr);
        return Err(Error::Extraction(msg));
    }

    if !stderr.is_empty() {
        warn!("{}: {}", tool.name(), stderr);
    }

    Ok(output)
}

fn failed(tool: &Tool, err: std::io::Error) -> Error {
    Error::Extraction(format!("{}: {}", tool.name(), err))
}

fn missing(tool: &Tool, stream: &str) -> Error {
    Error::Extraction(format!("{}: no {}", tool.name(), stream))
}
