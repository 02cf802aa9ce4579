//! HTML front-end served at `/`
//!
//! A single page with the expression inputs, API settings, result area and
//! status bar. The page talks to `POST /v1/check` and renders the returned
//! transcript verbatim.

use crate::core::config::Config;

const STYLE: &str = r#"
    * { box-sizing: border-box; }
    body { margin: 0; font-family: system-ui, sans-serif; background: #f4f4f4; color: #222;
           display: flex; flex-direction: column; min-height: 100vh; }
    main { flex: 1; max-width: 700px; width: 100%; margin: 0 auto; padding: 10px; }
    fieldset { border: 1px solid #bbb; border-radius: 4px; margin: 5px 0; padding: 10px; background: #fff; }
    legend { padding: 0 4px; }
    .row { display: grid; grid-template-columns: 110px 1fr auto; gap: 5px; align-items: center; margin: 5px 0; }
    .row input[type=text], .row input[type=password] { width: 100%; padding: 4px; }
    .buttons { margin: 10px 0; display: flex; gap: 10px; }
    #result { width: 100%; min-height: 220px; max-height: 50vh; overflow-y: auto; margin: 0;
              white-space: pre-wrap; word-wrap: break-word; font-family: ui-monospace, monospace;
              background: #fafafa; border: 1px solid #ddd; padding: 6px; }
    #status { border-top: 1px solid #999; padding: 3px 8px; background: #e8e8e8; font-size: 0.9em; }
"#;

const SCRIPT: &str = r#"
    const form = document.getElementById('check-form');
    const expr1 = document.getElementById('expr1');
    const expr2 = document.getElementById('expr2');
    const baseUrl = document.getElementById('base-url');
    const apiKey = document.getElementById('api-key');
    const model = document.getElementById('model');
    const temperature = document.getElementById('temperature');
    const temperatureLabel = document.getElementById('temperature-label');
    const verbose = document.getElementById('verbose');
    const checkButton = document.getElementById('check-button');
    const result = document.getElementById('result');
    const status = document.getElementById('status');

    document.getElementById('show-key').addEventListener('change', (event) => {
        apiKey.type = event.target.checked ? 'text' : 'password';
    });

    temperature.addEventListener('input', () => {
        temperatureLabel.textContent = Number(temperature.value).toFixed(1);
    });

    document.getElementById('clear-button').addEventListener('click', () => {
        expr1.value = '';
        expr2.value = '';
        result.textContent = '';
        status.textContent = 'Inputs cleared';
    });

    form.addEventListener('submit', async (event) => {
        event.preventDefault();
        const first = expr1.value.trim();
        const second = expr2.value.trim();
        if (!first || !second) {
            alert('Please enter both expressions');
            return;
        }

        const payload = {
            expr1: first,
            expr2: second,
            base_url: baseUrl.value.trim(),
            model: model.value.trim(),
            temperature: parseFloat(temperature.value),
            verbose: verbose.checked,
        };
        if (apiKey.value.trim()) {
            payload.api_key = apiKey.value.trim();
        }

        const previousStatus = status.textContent;
        result.textContent = '';
        checkButton.disabled = true;
        status.textContent = 'Checking...';

        try {
            const response = await fetch('/v1/check', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(payload),
            });
            const body = await response.json();
            if (!response.ok) {
                alert(body.error || 'Request failed');
                status.textContent = previousStatus;
                return;
            }
            result.textContent = body.lines.join('\n');
            result.scrollTop = result.scrollHeight;
            status.textContent = body.status;
        } catch (err) {
            result.textContent = 'Error: ' + err;
            status.textContent = 'Error: ' + err;
        } finally {
            checkButton.disabled = false;
        }
    });
"#;

/// Escape text for use inside HTML element content and attribute values
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the checker page with configured defaults pre-filled
///
/// The configured API key is never written into the page; a blank key field
/// means the server-side key is used, but only against the configured base URL.
pub fn index_page(config: &Config) -> String {
    let key_placeholder = if config.has_api_key() {
        "(server key, configured base URL only)"
    } else {
        "required"
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Expression Equivalence Checker</title>
    <style>{style}</style>
</head>
<body>
<main>
    <form id="check-form" autocomplete="off">
        <fieldset>
            <legend>Expressions</legend>
            <div class="row">
                <label for="expr1">Expression 1:</label>
                <input type="text" id="expr1" name="expr1">
                <span></span>
            </div>
            <div class="row">
                <label for="expr2">Expression 2:</label>
                <input type="text" id="expr2" name="expr2">
                <span></span>
            </div>
        </fieldset>
        <fieldset>
            <legend>API settings ({provider})</legend>
            <div class="row">
                <label for="base-url">Base URL:</label>
                <input type="text" id="base-url" name="base_url" value="{base_url}">
                <span></span>
            </div>
            <div class="row">
                <label for="api-key">API Key:</label>
                <input type="password" id="api-key" name="api_key" placeholder="{key_placeholder}">
                <label><input type="checkbox" id="show-key"> Show API key</label>
            </div>
            <div class="row">
                <label for="model">Model:</label>
                <input type="text" id="model" name="model" value="{model}">
                <span></span>
            </div>
            <div class="row">
                <label for="temperature">Temperature:</label>
                <input type="range" id="temperature" name="temperature" min="0" max="1" step="0.1" value="{temperature:.1}">
                <span id="temperature-label">{temperature:.1}</span>
            </div>
            <div class="row">
                <label><input type="checkbox" id="verbose" name="verbose"{verbose}> Verbose</label>
                <span></span>
                <span></span>
            </div>
        </fieldset>
        <div class="buttons">
            <button type="submit" id="check-button">Check equivalence</button>
            <button type="button" id="clear-button">Clear inputs</button>
        </div>
    </form>
    <fieldset>
        <legend>Result</legend>
        <pre id="result" aria-live="polite"></pre>
    </fieldset>
</main>
<div id="status">Ready</div>
<script>{script}</script>
</body>
</html>
"#,
        style = STYLE,
        script = SCRIPT,
        provider = html_escape(config.api.provider.as_str()),
        base_url = html_escape(&config.api.base_url),
        key_placeholder = key_placeholder,
        model = html_escape(&config.api.model),
        temperature = config.api.temperature,
        verbose = if config.api.verbose { " checked" } else { "" },
    )
}
