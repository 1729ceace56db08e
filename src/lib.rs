/*!
# Spreadsheet Dashboard

A small web dashboard over the spreadsheets kept in one Google Drive folder.

## Overview

The server lists the Google Sheets documents of a configured Drive folder,
orders them by the date embedded in their names, fetches a fixed cell range
from the selected spreadsheet and shows the rows in a sortable table.

## Architecture

### Google access
- **Credential Loader** - Reads the service-account email and PEM key from
  configuration, stripping quotes and unescaping `\n`
- **Auth** - Signs an RS256 JWT assertion and exchanges it for a bearer token
- **Drive Lister** - Lists the spreadsheets of a folder (id and name only)
- **Spreadsheet Fetcher** - Reads range `A1:Z1000` and keys every data row by
  the header row

### Row handling
- **Filename Date Sorter** - Newest-first ordering by the `YYYY-MM-DD` token
  in each file name; undated files are dropped
- **Row Normalizer** - Reshapes header-keyed rows into [`rows::NormalizedRow`],
  coercing counts to integers with a zero default

### Presentation
- **Dashboard state** - Listing, selection, rows, loading flag and error
  banner, changed only through transition methods
- **Table** - Column sort for the rendered table
- **API client** - Reads the JSON API from another server when a base URL
  override is configured

## REST API Endpoints

- `GET /api/spreadsheets` - `[{id, name}]`, newest first
- `GET /api/spreadsheet-data?id=<id>` - raw header-keyed rows
- `GET /?id=<id>&sort=<column>&order=<asc|desc>` - dashboard page

Errors are returned as `{"error": ..., "details": ...}` with status 400 for
requests the caller can fix and 500 otherwise.

## Modules

- **config**: Flags and environment configuration
- **credentials**: Service-account credential normalization
- **error**: Error type shared by every module
- **listing**: Spreadsheet listing types and date ordering
- **rows**: Raw and normalized row types, header keying and coercion
- **table**: Table column sorting
- **dashboard**: Page state controller and rendering
- **google**: Drive and Sheets API access (`web` feature)
- **client**: Client for the JSON API (`web` feature)
- **app**: Routing and server startup (`web` feature)
*/

pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod listing;
pub mod rows;
pub mod table;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod client;
#[cfg(feature = "web")]
pub mod google;

pub use error::{DashboardError, Result};
pub use listing::SpreadsheetInfo;
pub use rows::{NormalizedRow, RawRow};
