//! Sample posts shared by the unit tests.

pub(crate) const PLAIN_POST: &str = "# Hello\n\nNo charts here, just prose.\n";

pub(crate) const MERMAID_POST: &str = r#"---
title: Architecture
---

```mermaid

  graph TD
    A-->B

```

```mermaid
sequenceDiagram
  Alice->>Bob: hi
```
"#;

pub(crate) const ECHARTS_POST: &str = r#"# Sales

```echarts
{"xAxis": {"type": "category"}, "series": [{"type": "bar", "data": [1, 2, 3]}]}
```

Closing thoughts.
"#;

pub(crate) const MIXED_POST: &str = r#"# Dashboard

```mermaid
  graph LR
    X-->Y
```

```echarts
{"title": {"text": "Bob's revenue"}, "series": []}
```

```chartjs
{"type": "bar", "data": {"labels": ["a", "b"]}}
```

```plotly
{ "data" : [ {"x": [1, 2], "y": [3, 4]} ],
  "layout": { "title": "Growth" } }
```

```echarts
not-json
```

<div class="echarts-container" data-option='{"series": []}'></div>
<div class=plotly-chart data-plotly-data='[]'></div>
<div class="d3-chart"></div>

```html
<div class="chartjs-container"></div>
```
"#;

pub(crate) const NESTED_EXAMPLE_POST: &str = r#"How to write a chart:

````markdown
```echarts
{"series": []}
```
````
"#;

pub(crate) const HEAVY_ECHARTS_POST: &str = r#"```echarts
{"animation": true, "series": [{}, {}, {}, {}]}
```
"#;

pub(crate) const CONTROL_CHARS_POST: &str = r#"```chartjs
{"type": "a\n\u0060\u0060\u0060\r\tb"}
```

```
<div class="echarts-container"></div>
```
"#;

pub(crate) const STRAY_FENCE_POST: &str = "```\nstray opening fence\n\n```echarts\n{\"series\": []}\n```\n";

pub(crate) const CRLF_MERMAID_POST: &str = "```mermaid\r\n\r\n  graph TD\r\n    A-->B\r\n```\r\n\r\n```chartjs\r\n{\"type\": \"x\\r\\ny\"}\r\n```\r\n";

/// A post with `count` mermaid diagrams.
pub(crate) fn many_mermaid(count: usize) -> String {
	let mut post = String::from("# Diagrams\n\n");
	for index in 0..count {
		post.push_str(&format!("```mermaid\ngraph TD\n  N{index}-->M{index}\n```\n\n"));
	}
	post
}
