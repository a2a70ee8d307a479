//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Line-oriented question and answer I/O

use std::fmt::Display;
use std::io;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Reads answers from `R` and writes prompts and output to `W`
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Prompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Write a line of output
    pub async fn say(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Ask a question and return the trimmed answer.
    ///
    /// End of input is reported as [`io::ErrorKind::UnexpectedEof`].
    pub async fn ask(&mut self, question: &str) -> io::Result<String> {
        self.writer.write_all(question.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Ask a question and parse the answer. A malformed answer is returned as
    /// a printable message rather than an I/O error.
    pub async fn ask_parsed<T>(&mut self, question: &str) -> io::Result<Result<T, String>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let answer = self.ask(question).await?;
        Ok(answer
            .parse::<T>()
            .map_err(|e| format!("'{}' is not valid here: {}", answer, e)))
    }

    /// Like [`Prompt::ask_parsed`] but an empty answer keeps `current`
    pub async fn ask_parsed_or<T>(
        &mut self,
        question: &str,
        current: T,
    ) -> io::Result<Result<T, String>>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        let answer = self.ask(&format!("{} [{}]: ", question, current)).await?;
        if answer.is_empty() {
            return Ok(Ok(current));
        }
        Ok(answer
            .parse::<T>()
            .map_err(|e| format!("'{}' is not valid here: {}", answer, e)))
    }

    /// Ask for a value, offering `current` as the default when there is one
    pub async fn ask_value<T>(
        &mut self,
        question: &str,
        current: Option<T>,
    ) -> io::Result<Result<T, String>>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        match current {
            Some(current) => self.ask_parsed_or(question, current).await,
            None => self.ask_parsed(&format!("{}: ", question)).await,
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ask_trims_answer_and_echoes_question() {
        let mut prompt = Prompt::new(&b"  Thorin  \n"[..], Vec::new());
        let answer = prompt.ask("Name: ").await.unwrap();
        assert_eq!(answer, "Thorin");

        let (_, output) = prompt.into_inner();
        assert_eq!(String::from_utf8(output).unwrap(), "Name: ");
    }

    #[tokio::test]
    async fn test_ask_reports_end_of_input() {
        let mut prompt = Prompt::new(&b""[..], Vec::new());
        let err = prompt.ask("Name: ").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_ask_parsed_reports_bad_values() {
        let mut prompt = Prompt::new(&b"12\nabc\n"[..], Vec::new());
        let level: Result<i32, String> = prompt.ask_parsed("Level: ").await.unwrap();
        assert_eq!(level, Ok(12));

        let level: Result<i32, String> = prompt.ask_parsed("Level: ").await.unwrap();
        assert!(level.unwrap_err().starts_with("'abc' is not valid here"));
    }

    #[tokio::test]
    async fn test_ask_parsed_or_keeps_current_on_empty() {
        let mut prompt = Prompt::new(&b"\n7\n"[..], Vec::new());
        assert_eq!(prompt.ask_parsed_or("Level", 3).await.unwrap(), Ok(3));
        assert_eq!(prompt.ask_parsed_or("Level", 3).await.unwrap(), Ok(7));

        let (_, output) = prompt.into_inner();
        assert_eq!(String::from_utf8(output).unwrap(), "Level [3]: Level [3]: ");
    }
}
