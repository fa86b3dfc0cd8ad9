use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
};

use spellchipper::noise::TrainingExample;

/// `None` and `"-"` both select standard io.
fn file_path(path: &Option<String>) -> Option<&str> {
    path.as_deref().filter(|p| *p != "-")
}

/// Sentence input argument group.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Input file of sentences, one per line; "-" or omitted reads stdin.
    #[clap(long, default_value = None)]
    pub input: Option<String>,
}

impl InputArgs {
    /// Open a reader for the input.
    pub fn open_reader(&self) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
        Ok(match file_path(&self.input) {
            Some(p) => Box::new(BufReader::new(File::open(p)?)),
            None => Box::new(BufReader::new(std::io::stdin().lock())),
        })
    }
}

/// JSON-lines output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output file; "-" or omitted writes stdout.
    #[clap(long, default_value = None)]
    pub output: Option<String>,
}

impl OutputArgs {
    /// Open a JSON-lines writer for the output.
    pub fn open_writer(&self) -> Result<ExampleWriter, Box<dyn std::error::Error>> {
        let inner: Box<dyn Write> = match file_path(&self.output) {
            Some(p) => Box::new(BufWriter::new(File::create(p)?)),
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        };
        Ok(ExampleWriter { inner })
    }
}

/// Writes one JSON [`TrainingExample`] per line.
pub struct ExampleWriter {
    inner: Box<dyn Write>,
}

impl ExampleWriter {
    /// Write one example.
    pub fn write_example(
        &mut self,
        example: &TrainingExample,
    ) -> Result<(), Box<dyn std::error::Error>> {
        serde_json::to_writer(&mut self.inner, example)?;
        writeln!(self.inner)?;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.inner.flush()?;
        Ok(())
    }
}
