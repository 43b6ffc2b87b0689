//! Generic listing table: filter, sort, and paginate rows of any type.
//!
//! Columns describe how to render a row into a cell and, optionally, how to
//! order two rows. The table never owns the rows; a query returns a page of
//! references into the caller's slice.

use std::cmp::Ordering;

/// How a column renders and orders rows of type `T`.
pub struct Column<T> {
    pub header: &'static str,
    pub cell: fn(&T) -> String,
    pub compare: Option<fn(&T, &T) -> Ordering>,
}

impl<T> Column<T> {
    /// A column that can be displayed but not sorted on.
    pub fn new(header: &'static str, cell: fn(&T) -> String) -> Self {
        Self {
            header,
            cell,
            compare: None,
        }
    }

    #[must_use]
    pub fn sortable(mut self, compare: fn(&T, &T) -> Ordering) -> Self {
        self.compare = Some(compare);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// What to show: filter text, sort column, and which page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    /// Case-insensitive substring matched against every rendered cell.
    pub filter: Option<String>,

    /// Column index and direction. Ignored if the column isn't sortable.
    pub sort: Option<(usize, SortDirection)>,

    /// 1-based.
    pub page: usize,

    /// Rows per page; 0 is treated as 1.
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            page: 1,
            page_size: 20,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<R> {
    pub rows: Vec<R>,

    /// Rows matching the filter, across all pages.
    pub total: usize,

    pub page: usize,
    pub page_count: usize,
}

/// A set of columns over rows of type `T`.
pub struct Table<T> {
    columns: Vec<Column<T>>,
}

impl<T> Table<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Index of the column with this header, ignoring case.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.header.eq_ignore_ascii_case(header))
    }

    /// Renders every cell of a row, in column order.
    pub fn render_row(&self, row: &T) -> Vec<String> {
        self.columns.iter().map(|c| (c.cell)(row)).collect()
    }

    /// Filters, sorts (stably), and slices `rows` into the requested page.
    ///
    /// A page past the end yields no rows but still reports the totals.
    pub fn query<'a>(&self, rows: &'a [T], query: &TableQuery) -> Page<&'a T> {
        let needle = query
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<&T> = rows
            .iter()
            .filter(|row| match &needle {
                Some(needle) => self
                    .render_row(row)
                    .iter()
                    .any(|cell| cell.to_lowercase().contains(needle)),
                None => true,
            })
            .collect();

        if let Some((index, direction)) = query.sort
            && let Some(compare) = self.columns.get(index).and_then(|c| c.compare)
        {
            matched.sort_by(|a, b| match direction {
                SortDirection::Ascending => compare(*a, *b),
                SortDirection::Descending => compare(*b, *a),
            });
        }

        let total = matched.len();
        let page_size = query.page_size.max(1);
        let page = query.page.max(1);
        let page_count = total.div_ceil(page_size);
        let rows = matched
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Page {
            rows,
            total,
            page,
            page_count,
        }
    }
}
