// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求/响应数据传输对象和抓取用例
/// 用例负责编排领域服务与抓取引擎，自身不包含业务规则
pub mod dto;
pub mod use_cases;
