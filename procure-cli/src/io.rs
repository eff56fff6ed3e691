use clap::Args;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write, stdin, stdout},
    path::PathBuf,
    str::FromStr,
};

// Commands that read a request from a file and write an allocation share this.
#[derive(Args)]
pub struct IOArgs {
    /// The procurement request JSON file ("-" implies stdin)
    #[arg(value_parser = clap::value_parser!(PathOrStd))]
    input: PathOrStd,

    #[command(flatten)]
    output: OutputArgs,
}

impl IOArgs {
    pub fn read(&self) -> anyhow::Result<Box<dyn Read>> {
        match &self.input {
            PathOrStd::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            PathOrStd::Std => Ok(Box::new(stdin().lock())),
        }
    }

    pub fn output(&self) -> &OutputArgs {
        &self.output
    }
}

// Commands whose input comes from elsewhere (the database) only need this.
#[derive(Args)]
pub struct OutputArgs {
    /// The output file ("-" implies stdout)
    #[arg(short, long, default_value = "-", value_parser = clap::value_parser!(PathOrStd))]
    output: PathOrStd,
}

impl OutputArgs {
    pub fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        match &self.output {
            PathOrStd::Path(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
            PathOrStd::Std => Ok(Box::new(stdout().lock())),
        }
    }

    /// Write `value` as pretty-printed JSON followed by a newline
    pub fn emit<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let mut output = self.write()?;
        serde_json::to_writer_pretty(&mut output, value)?;
        writeln!(output)?;
        output.flush()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum PathOrStd {
    Path(PathBuf),
    Std,
}

impl FromStr for PathOrStd {
    type Err = <PathBuf as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Self::Std)
        } else {
            Ok(Self::Path(s.parse()?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_means_standard_streams() {
        assert_eq!("-".parse::<PathOrStd>(), Ok(PathOrStd::Std));
        assert_eq!(
            "out/allocation.json".parse::<PathOrStd>(),
            Ok(PathOrStd::Path(PathBuf::from("out/allocation.json")))
        );
    }
}
