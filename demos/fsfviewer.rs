use clap::{self, Parser};
use fsfio::{FsfFile, TimeMode};

#[derive(clap::Parser)]
struct Cmd {
    /// FSF file to read
    file: String,
    /// Print header and channel metadata as JSON
    #[arg(short, long)]
    summary: bool,
    /// Marker type codes to look up on every channel
    #[arg(short, long, num_args = 1..)]
    markers: Vec<i32>,
    /// Marker time representation: relative, absolute or index
    #[arg(long, default_value = "relative")]
    mode: String,
    /// Print the decoded samples of every channel
    #[arg(short, long)]
    data: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder().try_init();
    let cmd = Cmd::parse();
    let mode: TimeMode = cmd.mode.parse()?;
    let fsf = FsfFile::open(&cmd.file)?;
    if cmd.summary {
        println!("{}", fsf.summary()?);
    }
    for (i, ch) in fsf.channels().iter().enumerate() {
        for &code in &cmd.markers {
            if let Some(t) = fsf.marker_time(i, code, mode)? {
                println!("{}:{} marker {} {} = {}", ch.name, ch.component, code, mode, t);
            }
        }
    }
    if cmd.data {
        for (ch, wf) in fsf.channels().iter().zip(fsf.waveforms()) {
            println!("{}:{} {:?}", ch.name, ch.component, wf);
        }
    }
    Ok(())
}
