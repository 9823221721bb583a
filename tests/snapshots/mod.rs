//! Snapshot tests using insta
//!
//! Multi-line templates laid out the way they are written in practice.

use insta::assert_snapshot;
use twsql::{parse_template, Options, Params, TempNames, Value};

fn render(input: &str, params: &Params) -> String {
    let options = Options::default().with_temp_names(TempNames::Sequential("t".to_string()));
    match parse_template(input, params, &options) {
        Ok((sql, _)) => sql,
        Err(e) => format!("ERROR: {}", e),
    }
}

fn search_params(name: Option<&str>, ids: &[i64]) -> Params {
    let mut p = Params::new();
    p.insert("table_name".to_string(), Value::from("users"));
    p.insert("name".to_string(), Value::from(name));
    p.insert(
        "ids".to_string(),
        Value::List(ids.iter().copied().map(Value::Int).collect()),
    );
    p
}

const SEARCH: &str = "\
select
    id
  , name
from
    /*$table_name*/dummy_table
where
    1 = 1
    /*%if name is not None*/
    and name = /*:name*/'someone'
    /*end*/
    /*%if ids*/
    and id in (
        /*%for id in ids*/
        /*:id*/0,
        /*end*/
        -1
    )
    /*end*/
order by
    id";

#[test]
fn snapshot_search_all_filters() {
    let sql = render(SEARCH, &search_params(Some("alice"), &[3, 5]));
    assert_snapshot!(sql, @r"
select
    id
  , name
from
    users
where
    1 = 1
    and name = :name
    and id in (
        :t0_0_id,
        :t0_1_id,
        -1
    )
order by
    id
");
}

#[test]
fn snapshot_search_no_filters() {
    let sql = render(SEARCH, &search_params(None, &[]));
    assert_snapshot!(sql, @r"
select
    id
  , name
from
    users
where
    1 = 1
order by
    id
");
}

#[test]
fn snapshot_search_bad_condition() {
    let input = "select 1\n/*%if missing > 1*/\n, 2\n/*end*/";
    assert_snapshot!(render(input, &Params::new()), @r#"ERROR: name 'missing' is not defined in "missing > 1""#);
}
