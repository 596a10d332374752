use filedock_datasource::{ByteStream, Datasource, DatasourceExt};
use anyhow::{Context, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub async fn put(datasource: &dyn Datasource, name: &str, file: &Path) -> Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    datasource.save_or_log(name, Bytes::from(data)).await;
    Ok(())
}

/// Unlike the other commands this one reports a missing object as a failure
pub async fn get(datasource: &dyn Datasource, name: &str, out: Option<&Path>) -> Result<()> {
    let stream = datasource
        .get(name)
        .await?
        .with_context(|| format!("{} not found in {}", name, datasource.name()))?;

    match out {
        Some(path) => {
            let mut file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("failed to create {}", path.display()))?;
            let written = copy_stream(stream, &mut file).await?;
            tracing::info!("Wrote {} bytes to {}", written, path.display());
        }
        None => {
            copy_stream(stream, &mut tokio::io::stdout()).await?;
        }
    }

    Ok(())
}

pub async fn rm(datasource: &dyn Datasource, name: &str) -> Result<()> {
    datasource.delete_or_log(name).await;
    Ok(())
}

pub async fn size(datasource: &dyn Datasource, name: &str) -> Result<()> {
    println!("{}", datasource.size_or_zero(name).await);
    Ok(())
}

pub async fn usage(datasource: &dyn Datasource) -> Result<()> {
    println!("{}", datasource.full_size_or_zero().await);
    Ok(())
}

pub async fn clear(datasource: &dyn Datasource) -> Result<()> {
    datasource.clear_or_log().await;
    Ok(())
}

async fn copy_stream<W>(mut stream: ByteStream, writer: &mut W) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(chunk) = stream.try_next().await? {
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}
